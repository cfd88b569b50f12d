//! Request metrics for the market-data provider
//!
//! Tracks latency percentiles and success rates over a rolling window of
//! requests made by the poller and detail fetches.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of provider request metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful requests in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful requests in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of requests tracked
    pub total_requests: u64,
    /// Number of failed requests
    pub failed_requests: u64,
    /// Failures since the last success
    pub consecutive_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    samples: VecDeque<(f64, bool)>,
    total: u64,
    failed: u64,
    consecutive_failures: u64,
}

/// Collects request outcomes for one provider
#[derive(Debug)]
pub struct MetricsCollector {
    provider_name: String,
    counters: Mutex<Counters>,
}

impl MetricsCollector {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            counters: Mutex::new(Counters {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                ..Counters::default()
            }),
        }
    }

    /// Records a request with its duration and outcome
    pub fn record_request(&self, duration: Duration, success: bool) {
        let Ok(mut c) = self.counters.lock() else {
            return;
        };

        c.total += 1;
        if success {
            c.consecutive_failures = 0;
        } else {
            c.failed += 1;
            c.consecutive_failures += 1;
        }

        if c.samples.len() >= MAX_SAMPLES {
            c.samples.pop_front();
        }
        c.samples.push_back((duration.as_secs_f64() * 1000.0, success));
    }

    /// Computes current metrics from the collected samples
    pub fn snapshot(&self) -> ProviderMetrics {
        let (mut latencies, total, failed, consecutive_failures) = match self.counters.lock() {
            Ok(c) => (
                c.samples
                    .iter()
                    .filter(|(_, ok)| *ok)
                    .map(|(ms, _)| *ms)
                    .collect::<Vec<_>>(),
                c.total,
                c.failed,
                c.consecutive_failures,
            ),
            Err(_) => (Vec::new(), 0, 0, 0),
        };

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ProviderMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: if total > 0 {
                (total - failed) as f64 / total as f64
            } else {
                1.0
            },
            total_requests: total,
            failed_requests: failed,
            consecutive_failures,
        }
    }
}

/// Percentile of sorted values, rounded to the nearest index
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
