//! Usage metrics recording.
//!
//! The orchestrator records observations through the [`MetricsSink`] trait;
//! hosts decide where they go. [`UsageMetrics`] is the standard recorder and
//! renders the Prometheus text exposition format for a reporting endpoint.
//! This module only records and renders; storage and alerting live elsewhere.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::types::BackendKind;

/// Destination for usage observations.
///
/// Injected into the orchestrator so hosts (and tests) can substitute their
/// own recorder.
pub trait MetricsSink: Send + Sync {
    /// Count one model invocation on the given backend.
    fn record_model_usage(&self, backend: BackendKind);
    /// Observe one computed footprint (kg CO2).
    fn record_footprint(&self, kg: f64);
    /// Count one received streaming fragment.
    fn record_stream_chunk(&self);
    /// Observe the length of a user message in characters.
    fn record_message_length(&self, chars: usize);
    /// Observe one inference duration in seconds.
    fn record_inference_time(&self, seconds: f64);
    /// Raise the live-invocation gauge.
    fn inc_active_users(&self);
    /// Lower the live-invocation gauge.
    fn dec_active_users(&self);
}

/// Sink that drops every observation.
#[derive(Debug, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_model_usage(&self, _backend: BackendKind) {}
    fn record_footprint(&self, _kg: f64) {}
    fn record_stream_chunk(&self) {}
    fn record_message_length(&self, _chars: usize) {}
    fn record_inference_time(&self, _seconds: f64) {}
    fn inc_active_users(&self) {}
    fn dec_active_users(&self) {}
}

/// Histogram buckets for message length (characters).
const MESSAGE_LENGTH_BUCKETS: [f64; 6] = [10.0, 50.0, 100.0, 200.0, 500.0, 1000.0];

/// Count + sum pair backing a summary metric.
#[derive(Debug, Default)]
struct SummaryCell {
    count: AtomicU64,
    sum: Mutex<f64>,
}

impl SummaryCell {
    fn observe(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut sum = match self.sum.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *sum += value;
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn sum(&self) -> f64 {
        match self.sum.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Fixed-bucket histogram cell.
#[derive(Debug, Default)]
struct HistogramCell {
    /// Per-bucket counts, non-cumulative; index i counts observations with
    /// value <= MESSAGE_LENGTH_BUCKETS[i], the last slot is the overflow.
    buckets: [AtomicU64; MESSAGE_LENGTH_BUCKETS.len() + 1],
    summary: SummaryCell,
}

impl HistogramCell {
    fn observe(&self, value: f64) {
        let index = MESSAGE_LENGTH_BUCKETS
            .iter()
            .position(|&bound| value <= bound)
            .unwrap_or(MESSAGE_LENGTH_BUCKETS.len());
        self.buckets[index].fetch_add(1, Ordering::Relaxed);
        self.summary.observe(value);
    }
}

/// Thread-safe recorder for the assistant's usage metrics.
#[derive(Debug, Default)]
pub struct UsageMetrics {
    local_usage: AtomicU64,
    remote_usage: AtomicU64,
    footprint: SummaryCell,
    stream_chunks: AtomicU64,
    message_length: HistogramCell,
    inference_time: SummaryCell,
    active_users: AtomicI64,
}

impl UsageMetrics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Snapshot accessors --

    pub fn model_usage(&self, backend: BackendKind) -> u64 {
        match backend {
            BackendKind::Local => self.local_usage.load(Ordering::Relaxed),
            BackendKind::Remote => self.remote_usage.load(Ordering::Relaxed),
        }
    }

    pub fn footprint_count(&self) -> u64 {
        self.footprint.count()
    }

    pub fn footprint_sum(&self) -> f64 {
        self.footprint.sum()
    }

    pub fn stream_chunks(&self) -> u64 {
        self.stream_chunks.load(Ordering::Relaxed)
    }

    pub fn message_length_count(&self) -> u64 {
        self.message_length.summary.count()
    }

    pub fn inference_time_count(&self) -> u64 {
        self.inference_time.count()
    }

    pub fn active_users(&self) -> i64 {
        self.active_users.load(Ordering::Relaxed)
    }

    /// Render every instrument in the Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::with_capacity(1024);

        out.push_str("# HELP app_model_usage_total Total number of model invocations\n");
        out.push_str("# TYPE app_model_usage_total counter\n");
        let _ = writeln!(
            out,
            "app_model_usage_total{{model_type=\"local\"}} {}",
            self.local_usage.load(Ordering::Relaxed)
        );
        let _ = writeln!(
            out,
            "app_model_usage_total{{model_type=\"remote\"}} {}",
            self.remote_usage.load(Ordering::Relaxed)
        );

        out.push_str("# HELP app_carbon_footprint_kg Calculated carbon footprint in kg CO2\n");
        out.push_str("# TYPE app_carbon_footprint_kg summary\n");
        let _ = writeln!(out, "app_carbon_footprint_kg_sum {}", self.footprint.sum());
        let _ = writeln!(
            out,
            "app_carbon_footprint_kg_count {}",
            self.footprint.count()
        );

        out.push_str("# HELP app_streaming_chunks_total Total number of streaming chunks received\n");
        out.push_str("# TYPE app_streaming_chunks_total counter\n");
        let _ = writeln!(
            out,
            "app_streaming_chunks_total {}",
            self.stream_chunks.load(Ordering::Relaxed)
        );

        out.push_str("# HELP app_message_length_chars Length of user messages in characters\n");
        out.push_str("# TYPE app_message_length_chars histogram\n");
        let mut cumulative = 0u64;
        for (i, bound) in MESSAGE_LENGTH_BUCKETS.iter().enumerate() {
            cumulative += self.message_length.buckets[i].load(Ordering::Relaxed);
            let _ = writeln!(
                out,
                "app_message_length_chars_bucket{{le=\"{}\"}} {}",
                bound, cumulative
            );
        }
        cumulative += self.message_length.buckets[MESSAGE_LENGTH_BUCKETS.len()]
            .load(Ordering::Relaxed);
        let _ = writeln!(
            out,
            "app_message_length_chars_bucket{{le=\"+Inf\"}} {}",
            cumulative
        );
        let _ = writeln!(
            out,
            "app_message_length_chars_sum {}",
            self.message_length.summary.sum()
        );
        let _ = writeln!(
            out,
            "app_message_length_chars_count {}",
            self.message_length.summary.count()
        );

        out.push_str("# HELP app_inference_time_seconds Time spent in model inference\n");
        out.push_str("# TYPE app_inference_time_seconds summary\n");
        let _ = writeln!(
            out,
            "app_inference_time_seconds_sum {}",
            self.inference_time.sum()
        );
        let _ = writeln!(
            out,
            "app_inference_time_seconds_count {}",
            self.inference_time.count()
        );

        out.push_str("# HELP app_active_users_current Current number of active users\n");
        out.push_str("# TYPE app_active_users_current gauge\n");
        let _ = writeln!(
            out,
            "app_active_users_current {}",
            self.active_users.load(Ordering::Relaxed)
        );

        out
    }
}

impl MetricsSink for UsageMetrics {
    fn record_model_usage(&self, backend: BackendKind) {
        match backend {
            BackendKind::Local => self.local_usage.fetch_add(1, Ordering::Relaxed),
            BackendKind::Remote => self.remote_usage.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn record_footprint(&self, kg: f64) {
        self.footprint.observe(kg);
    }

    fn record_stream_chunk(&self) {
        self.stream_chunks.fetch_add(1, Ordering::Relaxed);
    }

    fn record_message_length(&self, chars: usize) {
        self.message_length.observe(chars as f64);
    }

    fn record_inference_time(&self, seconds: f64) {
        self.inference_time.observe(seconds);
    }

    fn inc_active_users(&self) {
        self.active_users.fetch_add(1, Ordering::Relaxed);
    }

    fn dec_active_users(&self) {
        self.active_users.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Guard that raises the live-invocation gauge on entry and lowers it when
/// dropped, so every exit path restores the pre-call value.
pub(crate) struct ActiveUserGuard {
    metrics: Arc<dyn MetricsSink>,
}

impl ActiveUserGuard {
    pub(crate) fn enter(metrics: Arc<dyn MetricsSink>) -> Self {
        metrics.inc_active_users();
        Self { metrics }
    }
}

impl Drop for ActiveUserGuard {
    fn drop(&mut self) {
        self.metrics.dec_active_users();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = UsageMetrics::new();
        metrics.record_model_usage(BackendKind::Local);
        metrics.record_model_usage(BackendKind::Remote);
        metrics.record_model_usage(BackendKind::Remote);
        metrics.record_stream_chunk();

        assert_eq!(metrics.model_usage(BackendKind::Local), 1);
        assert_eq!(metrics.model_usage(BackendKind::Remote), 2);
        assert_eq!(metrics.stream_chunks(), 1);
    }

    #[test]
    fn test_gauge_rises_and_falls() {
        let metrics = UsageMetrics::new();
        metrics.inc_active_users();
        metrics.inc_active_users();
        assert_eq!(metrics.active_users(), 2);
        metrics.dec_active_users();
        assert_eq!(metrics.active_users(), 1);
        metrics.dec_active_users();
        assert_eq!(metrics.active_users(), 0);
    }

    #[test]
    fn test_guard_restores_gauge() {
        let metrics: Arc<UsageMetrics> = Arc::new(UsageMetrics::new());
        {
            let sink: Arc<dyn MetricsSink> = Arc::clone(&metrics) as Arc<dyn MetricsSink>;
            let _guard = ActiveUserGuard::enter(sink);
            assert_eq!(metrics.active_users(), 1);
        }
        assert_eq!(metrics.active_users(), 0);
    }

    #[test]
    fn test_summary_observations() {
        let metrics = UsageMetrics::new();
        metrics.record_footprint(100.0);
        metrics.record_footprint(27.3);
        assert_eq!(metrics.footprint_count(), 2);
        assert!((metrics.footprint_sum() - 127.3).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_buckets_cumulative_in_render() {
        let metrics = UsageMetrics::new();
        metrics.record_message_length(5); // le=10
        metrics.record_message_length(60); // le=100
        metrics.record_message_length(5000); // +Inf only

        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"10\"} 1"));
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"50\"} 1"));
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"100\"} 2"));
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"1000\"} 2"));
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"+Inf\"} 3"));
        assert!(rendered.contains("app_message_length_chars_count 3"));
    }

    #[test]
    fn test_render_lists_every_instrument() {
        let metrics = UsageMetrics::new();
        let rendered = metrics.render_prometheus();
        for name in [
            "app_model_usage_total",
            "app_carbon_footprint_kg",
            "app_streaming_chunks_total",
            "app_message_length_chars",
            "app_inference_time_seconds",
            "app_active_users_current",
        ] {
            assert!(rendered.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_boundary_value_lands_in_bucket() {
        let metrics = UsageMetrics::new();
        metrics.record_message_length(10); // inclusive upper bound
        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("app_message_length_chars_bucket{le=\"10\"} 1"));
    }
}
