//! Observability infrastructure for the pricing service
//!
//! Prometheus metrics for prediction latency, prediction/training counters,
//! and the currently served model version.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PricerMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PricerMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    training_runs_total: IntCounter,
    model_info: GaugeVec,
}

impl PricerMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "pricer_prediction_latency_seconds",
                "Time spent transforming and scoring one prediction request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "pricer_predictions_total",
                "Total number of prediction requests served"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "pricer_prediction_errors_total",
                "Total number of prediction requests that failed"
            )
            .expect("Failed to register prediction_errors_total"),

            training_runs_total: register_int_counter!(
                "pricer_training_runs_total",
                "Total number of completed training runs"
            )
            .expect("Failed to register training_runs_total"),

            model_info: register_gauge_vec!(
                "pricer_model_info",
                "Information about the currently served model",
                &["trained_at"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Metrics handle for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PricerMetrics {
    _private: (),
}

impl Default for PricerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PricerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PricerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &'static PricerMetricsInner {
        GLOBAL_METRICS.get_or_init(PricerMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, seconds: f64) {
        self.inner().prediction_latency_seconds.observe(seconds);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_training_runs(&self) {
        self.inner().training_runs_total.inc();
    }

    /// Record the served model's training timestamp
    pub fn set_model_info(&self, trained_at: i64) {
        let trained_at = trained_at.to_string();
        self.inner()
            .model_info
            .with_label_values(&[trained_at.as_str()])
            .set(1.0);
    }
}
