//! Background fetch tasks
//!
//! Both the recurring market poll and the one-shot detail fetch report back
//! by sending an [`Action`] into the dashboard's update queue. Neither touches
//! dashboard state directly.

use crate::{
    metrics::MetricsCollector,
    provider::{MarketDataProvider, MarketsQuery},
    state::{Action, FetchToken, PollGeneration},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns the polling task; the task stops when the handle is cancelled or dropped
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the polling task. Safe to call more than once.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Fetches the market list once and turns the outcome into an action tagged
/// with `generation`
pub async fn poll_once(
    provider: &dyn MarketDataProvider,
    query: &MarketsQuery,
    generation: PollGeneration,
    metrics: &MetricsCollector,
) -> Action {
    let start = Instant::now();

    match provider.fetch_markets(query).await {
        Ok(coins) => {
            metrics.record_request(start.elapsed(), true);
            tracing::info!(
                count = coins.len(),
                provider = provider.provider_name(),
                latency_ms = start.elapsed().as_millis() as u64,
                "Fetched market list"
            );
            Action::CoinsLoaded {
                generation,
                coins,
                fetched_at: Utc::now(),
            }
        }
        Err(e) => {
            metrics.record_request(start.elapsed(), false);
            tracing::warn!(
                provider = provider.provider_name(),
                error = %e,
                "Failed to fetch market list, keeping previous data"
            );
            Action::PollFailed {
                generation,
                error: e.to_string(),
            }
        }
    }
}

/// Starts the recurring market poll
///
/// The first poll runs immediately, then one every `interval`. A failed poll
/// is not retried; the next tick is the retry. The loop also ends on its own
/// once the receiving side of `updates` is gone. Every result carries
/// `generation`.
pub fn spawn_poller(
    provider: Arc<dyn MarketDataProvider>,
    query: MarketsQuery,
    interval: Duration,
    generation: PollGeneration,
    updates: UnboundedSender<Action>,
    metrics: Arc<MetricsCollector>,
) -> PollHandle {
    let interval = interval.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        tracing::info!(
            refresh_interval_secs = interval.as_secs(),
            generation = generation.0,
            provider = provider.provider_name(),
            "Starting market poller"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let action = poll_once(provider.as_ref(), &query, generation, &metrics).await;
            if updates.send(action).is_err() {
                tracing::debug!("Update queue closed, stopping market poller");
                break;
            }
        }
    });

    PollHandle { task }
}

/// Fetches one coin's detail record in the background
///
/// The result is tagged with `token` so the reducer can drop it if the user
/// has navigated elsewhere in the meantime.
pub fn spawn_detail_fetch(
    provider: Arc<dyn MarketDataProvider>,
    id: String,
    vs_currency: String,
    token: FetchToken,
    updates: UnboundedSender<Action>,
    metrics: Arc<MetricsCollector>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = Instant::now();
        let action = match provider.fetch_coin(&id, &vs_currency).await {
            Ok(detail) => {
                metrics.record_request(start.elapsed(), true);
                tracing::debug!(coin = %id, "Fetched coin detail");
                Action::DetailLoaded {
                    token,
                    detail: Box::new(detail),
                }
            }
            Err(e) => {
                // A missing coin is a normal answer, not a provider failure
                metrics.record_request(start.elapsed(), e.is_not_found());
                tracing::warn!(coin = %id, error = %e, "Failed to fetch coin detail");
                Action::DetailFailed {
                    token,
                    error: e.to_string(),
                }
            }
        };

        if updates.send(action).is_err() {
            tracing::debug!(coin = %id, "Update queue closed, dropping coin detail");
        }
    })
}
