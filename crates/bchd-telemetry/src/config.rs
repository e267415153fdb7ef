//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging, trace export and metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for traces and logs
    pub service_name: String,

    /// OpenTelemetry OTLP endpoint. Trace export is disabled when unset.
    pub otlp_endpoint: Option<String>,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (mainnet, testnet3, regtest)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "bchd-client".to_string(),
            otlp_endpoint: None,
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "mainnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: bchd-client)
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: unset, no export)
    /// - `BCHD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `BCHD_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `BCHD_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `BCHD_NETWORK`: Network name (default: mainnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "bchd-client".to_string()),

            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            log_level: env::var("BCHD_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("BCHD_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("BCHD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: env::var("BCHD_NETWORK").unwrap_or_else(|_| "mainnet".to_string()),
        }
    }

    /// Configuration for tests: debug level, no export, plain console output.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            network: "regtest".to_string(),
            ..Self::default()
        }
    }

    /// Whether OTLP trace export is enabled.
    pub fn exports_traces(&self) -> bool {
        self.otlp_endpoint.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "bchd-client");
        assert_eq!(config.log_level, "info");
        assert!(!config.exports_traces());
    }

    #[test]
    fn test_testing_config() {
        let config = TelemetryConfig::for_testing();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.network, "regtest");
        assert!(config.console_output);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = TelemetryConfig::default();
        config.otlp_endpoint = Some("http://localhost:4317".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TelemetryConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.exports_traces());
    }
}
