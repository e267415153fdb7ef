//! # Client Configuration
//!
//! Endpoint and connection limits for the BCHD client.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::ClientError;

/// Default gRPC port of bchd.
pub const DEFAULT_PORT: u16 = 8335;

/// BCHD client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node host name or address.
    pub host: String,

    /// Node gRPC port.
    pub port: u16,

    /// Use TLS with the system root certificates.
    pub tls: bool,

    /// Timeout for establishing the connection, in seconds.
    pub connect_timeout_secs: u64,

    /// Per-call deadline, in seconds.
    pub request_timeout_secs: u64,

    /// Maximum concurrent requests on the channel.
    pub concurrency_limit: usize,

    /// How long close waits for in-flight work, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            tls: true,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            concurrency_limit: 64,
            shutdown_grace_secs: 5,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %value, "Ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

impl ClientConfig {
    /// Config pointing at `host:port` with default limits.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BCHD_HOST`: Node host (default: localhost)
    /// - `BCHD_PORT`: Node port (default: 8335)
    /// - `BCHD_TLS`: Use TLS (default: true)
    /// - `BCHD_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 10)
    /// - `BCHD_REQUEST_TIMEOUT_SECS`: Per-call deadline (default: 30)
    /// - `BCHD_CONCURRENCY_LIMIT`: Concurrent requests (default: 64)
    /// - `BCHD_SHUTDOWN_GRACE_SECS`: Close grace period (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("BCHD_HOST").unwrap_or(defaults.host),
            port: env_or("BCHD_PORT", defaults.port),
            tls: env::var("BCHD_TLS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.tls),
            connect_timeout_secs: env_or("BCHD_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
            request_timeout_secs: env_or("BCHD_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            concurrency_limit: env_or("BCHD_CONCURRENCY_LIMIT", defaults.concurrency_limit),
            shutdown_grace_secs: env_or("BCHD_SHUTDOWN_GRACE_SECS", defaults.shutdown_grace_secs),
        }
    }

    /// Create a config for testing (plaintext local node, short timeouts).
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18335,
            tls: false,
            connect_timeout_secs: 1,
            request_timeout_secs: 2,
            concurrency_limit: 16,
            shutdown_grace_secs: 1,
        }
    }

    /// Reject settings that cannot produce a working connection.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidConfig("port is 0".to_string()));
        }
        if self.concurrency_limit == 0 {
            return Err(ClientError::InvalidConfig(
                "concurrency_limit is 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Endpoint URI, `https://` when TLS is enabled.
    pub fn endpoint_uri(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Per-call deadline as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Close grace period as a duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
