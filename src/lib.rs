//! # Coin Dashboard
//!
//! A headless cryptocurrency market dashboard: it polls the top coins by
//! market cap from CoinGecko, filters them by a search term, keeps a
//! persisted set of favorites and shows a detail view per coin.
//!
//! The front end (web, desktop or terminal) only forwards user input to the
//! [`Dashboard`] and displays what [`Dashboard::render`] or
//! [`Dashboard::state`] return.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_dashboard::{Dashboard, DashboardConfig, MemoryStorage};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dashboard =
//!     Dashboard::with_coingecko(Arc::new(MemoryStorage::new()), DashboardConfig::default())?;
//! dashboard.start();
//!
//! // Wait for the first poll
//! dashboard.process_next().await;
//!
//! dashboard.search("eth");
//! dashboard.toggle_favorite("ethereum");
//! println!("{}", dashboard.render());
//!
//! dashboard.navigate("/coin/ethereum");
//! dashboard.process_next().await;
//! println!("{}", dashboard.render());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Poller (every 60s) ──┐
//! Detail fetch ────────┼──> update queue ──> reduce(state, action) ──> AppState
//! User input ──────────┘                           │                       │
//!                                                  └─ effects              └─> render
//!                                                     (fetch detail,
//!                                                      persist favorites)
//! ```
//!
//! ## Configuration
//!
//! Defaults live in [`constants`]; [`DashboardConfig`] overrides them per
//! instance (API base URL, currency, page size, refresh interval, timeout).

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod metrics;
pub mod poller;
pub mod provider;
pub mod providers;
pub mod render;
pub mod route;
pub mod state;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ProviderError, StorageError};
pub use favorites::{Favorites, FavoritesStore};
pub use filter::{filter_coins, SortKey, SortOrder};
pub use metrics::ProviderMetrics;
pub use provider::{MarketDataProvider, MarketsQuery};
pub use providers::CoinGeckoProvider;
pub use route::Route;
pub use state::{reduce, Action, AppState, DetailState, Effect, FetchToken, PollGeneration};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use types::{Coin, CoinDetail, ComponentHealth, DashboardEvent, HealthStatus};
