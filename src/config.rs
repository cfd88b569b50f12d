//! Runtime configuration for the dashboard

use crate::constants::{
    COINGECKO_API_URL, FAVORITES_STORAGE_KEY, MARKET_PAGE_SIZE, REFRESH_INTERVAL_SECS,
    STALE_THRESHOLD_SECS, USER_AGENT, VS_CURRENCY,
};
use std::time::Duration;

/// Settings shared by the provider, the poller and the dashboard.
///
/// `Default` mirrors the values in [`crate::constants`]. Use the `with_*`
/// methods to override individual values.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the market-data API
    pub api_base_url: String,
    /// Reference currency for prices
    pub vs_currency: String,
    /// Number of coins fetched per poll
    pub per_page: u32,
    /// Delay between polls
    pub refresh_interval: Duration,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    /// Storage key for the favorites list
    pub favorites_key: String,
    /// Age after which the coin list is reported as stale
    pub stale_threshold: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: COINGECKO_API_URL.to_string(),
            vs_currency: VS_CURRENCY.to_string(),
            per_page: MARKET_PAGE_SIZE,
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            request_timeout: None,
            favorites_key: FAVORITES_STORAGE_KEY.to_string(),
            stale_threshold: Duration::from_secs(STALE_THRESHOLD_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_vs_currency(mut self, currency: impl Into<String>) -> Self {
        self.vs_currency = currency.into().to_lowercase();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_favorites_key(mut self, key: impl Into<String>) -> Self {
        self.favorites_key = key.into();
        self
    }

    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = threshold;
        self
    }
}
