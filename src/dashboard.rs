//! The top-level dashboard view
//!
//! `Dashboard` owns the application state and is the only place it changes.
//! User input and background results alike become [`Action`]s that are
//! reduced one at a time; background tasks deliver theirs through a single
//! queue drained by [`Dashboard::process_next`] / [`Dashboard::process_pending`].

use crate::{
    config::DashboardConfig,
    error::ProviderError,
    favorites::FavoritesStore,
    filter::SortOrder,
    metrics::{MetricsCollector, ProviderMetrics},
    poller::{spawn_detail_fetch, spawn_poller, PollHandle},
    provider::{MarketDataProvider, MarketsQuery},
    providers::CoinGeckoProvider,
    render,
    route::Route,
    state::{reduce, Action, AppState, DetailState, Effect},
    storage::KeyValueStorage,
    types::{Coin, ComponentHealth, DashboardEvent, HealthStatus},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Market dashboard: coin list, search, favorites and detail view
///
/// Dropping the dashboard cancels its poller.
///
/// # Example
/// ```no_run
/// use coin_dashboard::{Dashboard, DashboardConfig, FileStorage};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = Arc::new(FileStorage::new("dashboard.json"));
/// let mut dashboard = Dashboard::with_coingecko(storage, DashboardConfig::default())?;
/// dashboard.start();
///
/// dashboard.process_next().await;
/// dashboard.search("bit");
/// println!("{}", dashboard.render());
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    state: AppState,
    config: DashboardConfig,
    provider: Arc<dyn MarketDataProvider>,
    favorites: FavoritesStore,
    metrics: Arc<MetricsCollector>,
    updates_tx: mpsc::UnboundedSender<Action>,
    updates_rx: mpsc::UnboundedReceiver<Action>,
    events: broadcast::Sender<DashboardEvent>,
    poller: Option<PollHandle>,
    detail_tasks: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Creates a dashboard and loads persisted favorites from `storage`
    ///
    /// Polling does not begin until [`Dashboard::start`].
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        storage: Arc<dyn KeyValueStorage>,
        config: DashboardConfig,
    ) -> Self {
        let favorites = FavoritesStore::new(storage, config.favorites_key.clone());
        let state = AppState::new(favorites.load());
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state,
            config,
            provider,
            favorites,
            metrics,
            updates_tx,
            updates_rx,
            events,
            poller: None,
            detail_tasks: Vec::new(),
        }
    }

    /// Creates a dashboard backed by the CoinGecko API
    pub fn with_coingecko(
        storage: Arc<dyn KeyValueStorage>,
        config: DashboardConfig,
    ) -> Result<Self, ProviderError> {
        let provider = Arc::new(CoinGeckoProvider::from_config(&config)?);
        Ok(Self::new(provider, storage, config))
    }

    /// Starts the market poll. Does nothing if it is already running.
    pub fn start(&mut self) {
        if self.is_polling() {
            return;
        }
        self.dispatch(Action::PollingStarted);
        self.poller = Some(spawn_poller(
            self.provider.clone(),
            MarketsQuery::from_config(&self.config),
            self.config.refresh_interval,
            self.state.poll_generation(),
            self.updates_tx.clone(),
            self.metrics.clone(),
        ));
    }

    /// Stops the market poll. Poll results still queued are discarded; an
    /// in-flight detail fetch may still deliver.
    pub fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
            self.dispatch(Action::PollingStopped);
            tracing::info!("Market poller stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Applies one action and runs the effects it produces
    pub fn dispatch(&mut self, action: Action) {
        let pending = self.state.pending_token();
        let generation = self.state.poll_generation();
        let event = match &action {
            Action::CoinsLoaded {
                generation: g,
                coins,
                ..
            } if *g == generation => Some(DashboardEvent::coins_refreshed(coins.len())),
            Action::PollFailed { generation: g, error } if *g == generation => {
                Some(DashboardEvent::poll_failed(error.clone()))
            }
            Action::CoinsLoaded { .. } | Action::PollFailed { .. } => {
                tracing::debug!("Discarding poll result from a stopped poller");
                None
            }
            Action::DetailLoaded { token, detail } if pending == Some(*token) => {
                Some(DashboardEvent::detail_resolved(detail.id.clone(), true))
            }
            Action::DetailFailed { token, error } if pending == Some(*token) => {
                tracing::debug!(error = %error, "Detail view falls back to not found");
                match &self.state.detail {
                    DetailState::Loading { id, .. } => {
                        Some(DashboardEvent::detail_resolved(id.clone(), false))
                    }
                    _ => None,
                }
            }
            Action::DetailLoaded { .. } | Action::DetailFailed { .. } => {
                tracing::debug!("Discarding detail result for a superseded view");
                None
            }
            _ => None,
        };

        let (next, effects) = reduce(std::mem::take(&mut self.state), action);
        self.state = next;

        for effect in effects {
            self.run_effect(effect);
        }

        if let Some(event) = event {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchDetail { id, token } => {
                self.detail_tasks.retain(|t| !t.is_finished());
                let task = spawn_detail_fetch(
                    self.provider.clone(),
                    id,
                    self.config.vs_currency.clone(),
                    token,
                    self.updates_tx.clone(),
                    self.metrics.clone(),
                );
                self.detail_tasks.push(task);
            }
            Effect::PersistFavorites(favorites) => {
                if let Err(e) = self.favorites.persist(&favorites) {
                    tracing::warn!(error = %e, "Failed to persist favorites");
                }
                let _ = self
                    .events
                    .send(DashboardEvent::favorites_changed(favorites.to_vec()));
            }
        }
    }

    /// Waits for the next background result and applies it
    ///
    /// # Returns
    /// `false` without waiting when nothing is queued and no poller or detail
    /// fetch is running, so nothing could ever arrive
    pub async fn process_next(&mut self) -> bool {
        // Tasks send before finishing, so check them before the queue
        self.detail_tasks.retain(|t| !t.is_finished());
        let idle = !self.is_polling() && self.detail_tasks.is_empty();

        if let Ok(action) = self.updates_rx.try_recv() {
            self.dispatch(action);
            return true;
        }
        if idle {
            return false;
        }

        match self.updates_rx.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Applies every background result already queued, without waiting
    ///
    /// # Returns
    /// The number of actions processed, including stale ones the reducer
    /// discarded
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(action) = self.updates_rx.try_recv() {
            self.dispatch(action);
            processed += 1;
        }
        processed
    }

    /// Sets the search term
    pub fn search(&mut self, term: impl Into<String>) {
        self.dispatch(Action::SearchChanged(term.into()));
    }

    /// Flips favorite status of `id` and persists the set
    pub fn toggle_favorite(&mut self, id: impl Into<String>) {
        self.dispatch(Action::ToggleFavorite(id.into()));
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.dispatch(Action::SortChanged(sort));
    }

    pub fn set_favorites_only(&mut self, only: bool) {
        self.dispatch(Action::FavoritesOnlyChanged(only));
    }

    /// Moves to `path`; a coin path starts a detail fetch
    pub fn navigate(&mut self, path: &str) {
        self.dispatch(Action::Navigate(Route::parse(path)));
    }

    /// Returns to the list
    pub fn back(&mut self) {
        self.dispatch(Action::Navigate(Route::List));
    }

    /// Current location path
    pub fn location(&self) -> String {
        self.state.route.path()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn visible_coins(&self) -> Vec<&Coin> {
        self.state.visible_coins()
    }

    /// Renders the current view
    pub fn render(&self) -> String {
        render::render(&self.state)
    }

    /// Subscribes to dashboard events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Returns request metrics for the provider
    pub fn metrics(&self) -> ProviderMetrics {
        self.metrics.snapshot()
    }

    /// Reports whether the dashboard has fresh market data
    pub fn health_check(&self) -> ComponentHealth {
        let mut details = HashMap::new();
        details.insert(
            "coin_count".to_string(),
            serde_json::json!(self.state.coins.len()),
        );
        details.insert(
            "favorites".to_string(),
            serde_json::json!(self.state.favorites.len()),
        );
        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.provider.provider_name()),
        );
        details.insert("polling".to_string(), serde_json::json!(self.is_polling()));
        if let Some(error) = &self.state.last_error {
            details.insert("last_error".to_string(), serde_json::json!(error));
        }

        let age = self
            .state
            .last_updated
            .map(|t| Utc::now().signed_duration_since(t).to_std().unwrap_or_default());
        if let Some(age) = age {
            details.insert("data_age_secs".to_string(), serde_json::json!(age.as_secs()));
        }
        let stale = age.is_some_and(|a| a > self.config.stale_threshold);

        let status = if self.state.coins.is_empty() {
            HealthStatus::Unhealthy
        } else if stale || self.state.last_error.is_some() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let message = match status {
            HealthStatus::Healthy => "Dashboard has fresh market data".to_string(),
            HealthStatus::Degraded if stale => "Dashboard market data is stale".to_string(),
            HealthStatus::Degraded => "Last market refresh failed".to_string(),
            HealthStatus::Unhealthy => "Dashboard has no market data".to_string(),
        };

        ComponentHealth {
            name: "coin_dashboard".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: Utc::now(),
        }
    }
}
