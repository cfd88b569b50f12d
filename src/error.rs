//! Error types for the coin dashboard

use thiserror::Error;

/// Errors that can occur when fetching data from a market-data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The requested coin does not exist at the provider
    #[error("Coin not found: {0}")]
    NotFound(String),

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Provider API error
    #[error("Provider API error: {0}")]
    ApiError(String),
}

impl ProviderError {
    /// Returns true if the provider reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised by the favorites storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend is unusable (e.g. a poisoned lock)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
