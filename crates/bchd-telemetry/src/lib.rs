//! # BCHD Telemetry
//!
//! Observability for the BCHD client.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with env-filter, pretty or JSON output
//! - **Traces**: optional OpenTelemetry OTLP export
//! - **Metrics**: Prometheus counters/histograms for calls and subscriptions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bchd_telemetry::{TelemetryConfig, init_telemetry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset | OTLP endpoint, enables trace export |
//! | `OTEL_SERVICE_NAME` | `bchd-client` | Service name in traces |
//! | `BCHD_LOG_LEVEL` | `info` | Log level filter |
//! | `BCHD_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, RpcTimer, CONNECTION_EVENTS, RPC_CALLS,
    RPC_DURATION, SUBSCRIPTIONS_ACTIVE, SUBSCRIPTION_CLOSURES, SUBSCRIPTION_EVENTS,
    SUBSCRIPTION_SKIPPED,
};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The tracer or subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    /// The Prometheus registry rejected a collector.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration could not be applied.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging, trace export and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
/// When dropped, it flushes pending spans.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let tracing = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing,
        metrics,
    })
}

/// Guard that keeps telemetry active. Drop to flush and shutdown.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    /// Metrics registered by [`init_telemetry`].
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
