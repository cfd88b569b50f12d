//! Types for the coin dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One coin's market snapshot, as returned by the markets endpoint.
///
/// A poll replaces the whole collection of these records; fields are never
/// patched individually. The provider reports `null` for many numeric fields,
/// so they are all optional. An absent `max_supply` means unbounded supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default, rename = "price_change_percentage_1h_in_currency")]
    pub price_change_percentage_1h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, rename = "price_change_percentage_7d_in_currency")]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default, rename = "price_change_percentage_30d_in_currency")]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub ath_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub atl: Option<f64>,
    #[serde(default)]
    pub atl_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Coin {
    /// Creates a coin with only its identity fields set
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_percentage_1h: None,
            price_change_percentage_24h: None,
            price_change_percentage_7d: None,
            price_change_percentage_30d: None,
            market_cap_change_24h: None,
            market_cap_change_percentage_24h: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            ath: None,
            ath_date: None,
            atl: None,
            atl_date: None,
            last_updated: None,
        }
    }
}

/// Extended record for a single coin, flattened to one reference currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub current_price: Option<f64>,
    pub price_change_percentage_1h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d: Option<f64>,
    pub price_change_percentage_30d: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub atl: Option<f64>,
    pub atl_date: Option<DateTime<Utc>>,
}

impl From<&Coin> for CoinDetail {
    fn from(coin: &Coin) -> Self {
        Self {
            id: coin.id.clone(),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
            image: coin.image.clone(),
            market_cap_rank: coin.market_cap_rank,
            current_price: coin.current_price,
            price_change_percentage_1h: coin.price_change_percentage_1h,
            price_change_percentage_24h: coin.price_change_percentage_24h,
            price_change_percentage_7d: coin.price_change_percentage_7d,
            price_change_percentage_30d: coin.price_change_percentage_30d,
            market_cap: coin.market_cap,
            market_cap_change_24h: coin.market_cap_change_24h,
            market_cap_change_percentage_24h: coin.market_cap_change_percentage_24h,
            total_volume: coin.total_volume,
            high_24h: coin.high_24h,
            low_24h: coin.low_24h,
            circulating_supply: coin.circulating_supply,
            total_supply: coin.total_supply,
            max_supply: coin.max_supply,
            ath: coin.ath,
            ath_date: coin.ath_date,
            atl: coin.atl,
            atl_date: coin.atl_date,
        }
    }
}

/// Dashboard events broadcast to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// A poll replaced the coin collection
    CoinsRefreshed {
        id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A poll failed; the previous collection was kept
    PollFailed {
        id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The favorites set changed
    FavoritesChanged {
        id: Uuid,
        favorites: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A detail fetch settled for the current detail view
    DetailResolved {
        id: Uuid,
        coin_id: String,
        found: bool,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub fn coins_refreshed(count: usize) -> Self {
        Self::CoinsRefreshed {
            id: Uuid::new_v4(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn poll_failed(error_message: impl Into<String>) -> Self {
        Self::PollFailed {
            id: Uuid::new_v4(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn favorites_changed(favorites: Vec<String>) -> Self {
        Self::FavoritesChanged {
            id: Uuid::new_v4(),
            favorites,
            timestamp: Utc::now(),
        }
    }

    pub fn detail_resolved(coin_id: impl Into<String>, found: bool) -> Self {
        Self::DetailResolved {
            id: Uuid::new_v4(),
            coin_id: coin_id.into(),
            found,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::CoinsRefreshed { id, .. } => *id,
            DashboardEvent::PollFailed { id, .. } => *id,
            DashboardEvent::FavoritesChanged { id, .. } => *id,
            DashboardEvent::DetailResolved { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::CoinsRefreshed { .. } => "COINS_REFRESHED",
            DashboardEvent::PollFailed { .. } => "POLL_FAILED",
            DashboardEvent::FavoritesChanged { .. } => "FAVORITES_CHANGED",
            DashboardEvent::DetailResolved { .. } => "DETAIL_RESOLVED",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardEvent::CoinsRefreshed { count, .. } => {
                write!(f, "Coins refreshed: {} records", count)
            }
            DashboardEvent::PollFailed { error_message, .. } => {
                write!(f, "Poll failed: {}", error_message)
            }
            DashboardEvent::FavoritesChanged { favorites, .. } => {
                write!(f, "Favorites changed: {} coins", favorites.len())
            }
            DashboardEvent::DetailResolved { coin_id, found, .. } => {
                if *found {
                    write!(f, "Detail loaded for {}", coin_id)
                } else {
                    write!(f, "Detail not found for {}", coin_id)
                }
            }
        }
    }
}

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Fresh data is available
    Healthy,
    /// Data is available but stale, or the last poll failed
    Degraded,
    /// No data has been loaded
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}
