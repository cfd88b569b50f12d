//! Constants for the coin dashboard
//!
//! Defaults for every runtime knob live here. `DashboardConfig::default()`
//! is built from these values, so a dashboard runs with zero configuration.

/// How often to poll the market list (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Number of coins requested per poll
pub const MARKET_PAGE_SIZE: u32 = 100;

/// Reference currency for prices
pub const VS_CURRENCY: &str = "usd";

/// Ordering requested from the markets endpoint
pub const MARKET_ORDER: &str = "market_cap_desc";

/// Change windows requested alongside the market list
pub const PRICE_CHANGE_WINDOWS: &str = "1h,24h,7d,30d";

/// How long without a successful poll before the data counts as stale (in seconds)
pub const STALE_THRESHOLD_SECS: u64 = 180;

/// Storage key holding the favorites list
pub const FAVORITES_STORAGE_KEY: &str = "favorites";

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for the ranked market list
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// CoinGecko endpoint prefix for a single coin
pub const COINGECKO_COIN_ENDPOINT: &str = "/coins";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard/0.1.0";
