//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ServiceError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    // === Store ===
    /// Load the built-in seed records at startup.
    #[serde(default = "default_true")]
    pub seed_people: bool,

    // === Health Probes ===
    /// Mount the /live and /ready endpoints.
    #[serde(default = "default_true")]
    pub health_enabled: bool,

    /// Liveness fails once more tasks than this are alive.
    #[serde(default = "default_max_tasks")]
    pub health_max_tasks: usize,

    /// Hostname that must resolve for the service to be ready.
    #[serde(default = "default_upstream_host")]
    pub health_upstream_host: String,

    /// DNS resolution timeout for the readiness check, in milliseconds.
    #[serde(default = "default_dns_timeout_ms")]
    pub health_dns_timeout_ms: u64,

    // === Metrics ===
    /// Install the Prometheus recorder and mount /metrics.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_tasks() -> usize {
    100
}

fn default_upstream_host() -> String {
    "localhost".to_string()
}

fn default_dns_timeout_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rust_log: default_log_level(),
            seed_people: true,
            health_enabled: true,
            health_max_tasks: default_max_tasks(),
            health_upstream_host: default_upstream_host(),
            health_dns_timeout_ms: default_dns_timeout_ms(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load configuration, apply a CLI port override and validate.
    pub fn load_validated(port_override: Option<u16>) -> crate::Result<Self> {
        Self::load()?.prepare(port_override)
    }

    /// Apply a CLI port override and validate.
    pub fn prepare(mut self, port_override: Option<u16>) -> crate::Result<Self> {
        if let Some(port) = port_override {
            self.port = port;
        }
        self.validate().map_err(ServiceError::InvalidConfig)?;
        Ok(self)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.health_enabled {
            if self.health_max_tasks == 0 {
                return Err("HEALTH_MAX_TASKS must be at least 1".to_string());
            }

            if self.health_dns_timeout_ms == 0 {
                return Err("HEALTH_DNS_TIMEOUT_MS must be at least 1".to_string());
            }

            if self.health_upstream_host.is_empty() {
                return Err("HEALTH_UPSTREAM_HOST is required when health is enabled".to_string());
            }
        }

        Ok(())
    }

    /// Readiness DNS timeout as a [`Duration`].
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.health_dns_timeout_ms)
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
