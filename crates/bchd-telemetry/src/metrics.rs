//! Prometheus metrics for the BCHD client.
//!
//! All metrics follow the naming convention: `bchd_client_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., rpc_calls_total)
//! - **Gauge**: Value that can go up or down (e.g., subscriptions_active)
//! - **Histogram**: Distribution of values (e.g., rpc_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // QUERY METRICS
    // =========================================================================

    /// Request/response calls issued, by remote method and outcome
    pub static ref RPC_CALLS: CounterVec = CounterVec::new(
        Opts::new("bchd_client_rpc_calls_total", "Request/response calls issued to the node"),
        &["method", "outcome"]  // outcome: ok/remote_error/closed/malformed
    ).expect("metric creation failed");

    /// Request/response latency, by remote method
    pub static ref RPC_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "bchd_client_rpc_duration_seconds",
            "Time from issuing a call to receiving its reply"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("bucket layout")),
        &["method"]
    ).expect("metric creation failed");

    // =========================================================================
    // SUBSCRIPTION METRICS
    // =========================================================================

    /// Push events delivered to consumers, by subscription kind
    pub static ref SUBSCRIPTION_EVENTS: CounterVec = CounterVec::new(
        Opts::new("bchd_client_subscription_events_total", "Push events delivered to consumers"),
        &["kind"]  // kind: blocks/transactions
    ).expect("metric creation failed");

    /// Push messages that could not be mapped and were skipped
    pub static ref SUBSCRIPTION_SKIPPED: CounterVec = CounterVec::new(
        Opts::new("bchd_client_subscription_skipped_total", "Push messages skipped by the mapper"),
        &["kind"]
    ).expect("metric creation failed");

    /// Currently open subscriptions
    pub static ref SUBSCRIPTIONS_ACTIVE: GaugeVec = GaugeVec::new(
        Opts::new("bchd_client_subscriptions_active", "Subscriptions currently open"),
        &["kind"]
    ).expect("metric creation failed");

    /// Subscription terminations, by kind and reason
    pub static ref SUBSCRIPTION_CLOSURES: CounterVec = CounterVec::new(
        Opts::new("bchd_client_subscription_closures_total", "Subscriptions closed"),
        &["kind", "reason"]  // reason: cancelled/remote_closed/stream_failed/connection_closed
    ).expect("metric creation failed");

    // =========================================================================
    // CONNECTION METRICS
    // =========================================================================

    /// Connection lifecycle events
    pub static ref CONNECTION_EVENTS: CounterVec = CounterVec::new(
        Opts::new("bchd_client_connection_events_total", "Connection open/close outcomes"),
        &["event", "outcome"]  // event: open/close, outcome: ok/failed
    ).expect("metric creation failed");
}

/// Handle to the registry the client metrics were registered with.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Encode all registered metrics as Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry.
///
/// Registering twice is harmless: collectors that are already present are
/// skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Queries
        Box::new(RPC_CALLS.clone()),
        Box::new(RPC_DURATION.clone()),
        // Subscriptions
        Box::new(SUBSCRIPTION_EVENTS.clone()),
        Box::new(SUBSCRIPTION_SKIPPED.clone()),
        Box::new(SUBSCRIPTIONS_ACTIVE.clone()),
        Box::new(SUBSCRIPTION_CLOSURES.clone()),
        // Connection
        Box::new(CONNECTION_EVENTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics of the global registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer for one remote call.
///
/// Observes the elapsed time into [`RPC_DURATION`] on drop and counts the
/// call into [`RPC_CALLS`] with the outcome recorded via [`RpcTimer::finish`]
/// (or `"dropped"` if the call future was abandoned).
pub struct RpcTimer {
    method: &'static str,
    outcome: &'static str,
    start: Instant,
}

impl RpcTimer {
    /// Start timing a call to `method`.
    pub fn start(method: &'static str) -> Self {
        Self {
            method,
            outcome: "dropped",
            start: Instant::now(),
        }
    }

    /// Record the outcome label for this call.
    pub fn finish(mut self, outcome: &'static str) {
        self.outcome = outcome;
    }
}

impl Drop for RpcTimer {
    fn drop(&mut self) {
        RPC_DURATION
            .with_label_values(&[self.method])
            .observe(self.start.elapsed().as_secs_f64());
        RPC_CALLS
            .with_label_values(&[self.method, self.outcome])
            .inc();
    }
}
