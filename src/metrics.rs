//! Latency and throughput tracking for model inference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept before the oldest half is dropped.
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for runtime calls
pub struct InferenceMetrics {
    /// Runtime invocations
    pub runs: AtomicU64,
    /// Rows predicted across all runs
    pub rows: AtomicU64,
    /// Run latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            rows: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(64)),
            start_time: Instant::now(),
        }
    }

    /// Record one runtime call over `batch` rows.
    pub fn record_run(&self, elapsed: Duration, batch: usize) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.rows.fetch_add(batch as u64, Ordering::Relaxed);

        if let Ok(mut times) = self.latencies.write() {
            times.push(elapsed.as_micros() as u64);
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Latency statistics over the retained samples.
    pub fn stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(times) => times.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if sorted.is_empty() {
            return LatencyStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let pick = |q: f64| sorted[((count as f64 * q) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: pick(0.50),
            p95_us: pick(0.95),
            p99_us: pick(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Rows predicted per second since creation.
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.rows.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let stats = self.stats();
        info!(
            runs = self.runs.load(Ordering::Relaxed),
            rows = self.rows.load(Ordering::Relaxed),
            throughput = format!("{:.1} rows/s", self.throughput()),
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "Inference summary"
        );
    }
}

impl Default for InferenceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics in microseconds
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
