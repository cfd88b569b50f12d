//! Provider abstraction for fetching market data from external APIs

use crate::{
    config::DashboardConfig,
    constants::MARKET_ORDER,
    error::ProviderError,
    types::{Coin, CoinDetail},
};
use async_trait::async_trait;

/// Parameters for a market list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    /// Reference currency (e.g. "usd")
    pub vs_currency: String,
    /// Ordering understood by the provider (e.g. "market_cap_desc")
    pub order: String,
    /// Page size
    pub per_page: u32,
}

impl MarketsQuery {
    /// Builds the top-N-by-market-cap query described by the config
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            vs_currency: config.vs_currency.clone(),
            order: MARKET_ORDER.to_string(),
            per_page: config.per_page,
        }
    }
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// Trait for market-data providers
///
/// Implementations fetch the ranked market list and single-coin detail
/// records from a source such as CoinGecko.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of the ranked market list
    ///
    /// # Arguments
    /// * `query` - Currency, ordering and page size
    ///
    /// # Returns
    /// The coins in provider order, or an error if the fetch fails
    async fn fetch_markets(&self, query: &MarketsQuery) -> Result<Vec<Coin>, ProviderError>;

    /// Fetches the extended record for one coin
    ///
    /// Returns `ProviderError::NotFound` if the provider has no such coin.
    async fn fetch_coin(&self, id: &str, vs_currency: &str) -> Result<CoinDetail, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
