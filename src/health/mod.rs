//! Health module for liveness and readiness probes.
//!
//! Checks are registered by name under a probe. Evaluating the liveness
//! probe runs only liveness checks; evaluating readiness runs both groups,
//! since a process that is not alive cannot be ready.

pub mod checks;

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::Config;
use crate::error::HealthError;
use crate::metrics;

pub use checks::{alive_tasks, Check, Probe, Resolver, SystemResolver};

/// Name of the default liveness check.
pub const TASK_THRESHOLD_CHECK: &str = "task-threshold";
/// Name of the default readiness check.
pub const UPSTREAM_DNS_CHECK: &str = "upstream-dns";

/// Registered liveness and readiness checks.
#[derive(Debug, Clone, Default)]
pub struct HealthChecks {
    liveness: Vec<(String, Check)>,
    readiness: Vec<(String, Check)>,
}

impl HealthChecks {
    /// Create an empty registry. Both probes pass until checks are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the task threshold and upstream DNS checks from config.
    pub fn from_config(config: &Config) -> Self {
        let mut checks = Self::new();
        checks.add_liveness_check(
            TASK_THRESHOLD_CHECK,
            Check::TaskThreshold {
                max: config.health_max_tasks,
            },
        );
        checks.add_readiness_check(
            UPSTREAM_DNS_CHECK,
            Check::dns(config.health_upstream_host.clone(), config.dns_timeout()),
        );
        checks
    }

    /// Register a liveness check.
    pub fn add_liveness_check(&mut self, name: impl Into<String>, check: Check) {
        self.liveness.push((name.into(), check));
    }

    /// Register a readiness check.
    pub fn add_readiness_check(&mut self, name: impl Into<String>, check: Check) {
        self.readiness.push((name.into(), check));
    }

    /// Run every check belonging to `probe`.
    pub async fn evaluate(&self, probe: Probe) -> HealthReport {
        let mut selected: Vec<&(String, Check)> = self.liveness.iter().collect();
        if probe == Probe::Readiness {
            selected.extend(self.readiness.iter());
        }

        let mut results = BTreeMap::new();
        for (name, check) in selected {
            let result = check.run().await;
            if let Err(ref e) = result {
                warn!(probe = %probe, check = %name, error = %e, "Health check failed");
                metrics::inc_health_check_failures(&probe.to_string(), name);
            }
            results.insert(name.clone(), result);
        }

        HealthReport { probe, results }
    }
}

/// Outcome of evaluating one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// Probe that was evaluated.
    pub probe: Probe,
    /// Result per check name.
    pub results: BTreeMap<String, Result<(), HealthError>>,
}

impl HealthReport {
    /// Whether every check passed.
    pub fn is_healthy(&self) -> bool {
        self.results.values().all(Result::is_ok)
    }

    /// Check name to `"OK"` or the failure message.
    pub fn details(&self) -> BTreeMap<String, String> {
        self.results
            .iter()
            .map(|(name, result)| {
                let status = match result {
                    Ok(()) => "OK".to_string(),
                    Err(e) => e.to_string(),
                };
                (name.clone(), status)
            })
            .collect()
    }
}
