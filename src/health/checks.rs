//! Individual liveness and readiness checks.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use strum::Display;
use tokio::net::lookup_host;

use crate::error::HealthError;

/// Which probe a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Probe {
    /// Process is alive.
    #[strum(to_string = "live")]
    Liveness,
    /// Process can serve dependent traffic.
    #[strum(to_string = "ready")]
    Readiness,
}

/// Hostname resolution used by the readiness check.
pub trait Resolver: fmt::Debug + Send + Sync {
    /// Resolve `host` to socket addresses.
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, io::Result<Vec<SocketAddr>>>;
}

/// Resolver backed by the operating system via [`tokio::net::lookup_host`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, io::Result<Vec<SocketAddr>>> {
        async move { Ok(lookup_host((host, 0)).await?.collect()) }.boxed()
    }
}

/// A single health check.
#[derive(Debug, Clone)]
pub enum Check {
    /// Fails when more than `max` tasks are alive on the runtime.
    TaskThreshold {
        /// Maximum alive task count.
        max: usize,
    },
    /// Fails when `host` does not resolve within `timeout`.
    DnsResolve {
        /// Hostname to resolve.
        host: String,
        /// Resolution deadline.
        timeout: Duration,
        /// Resolver performing the lookup.
        resolver: Arc<dyn Resolver>,
    },
}

impl Check {
    /// DNS check using the system resolver.
    pub fn dns(host: impl Into<String>, timeout: Duration) -> Self {
        Self::dns_with(host, timeout, Arc::new(SystemResolver))
    }

    /// DNS check using a custom resolver.
    pub fn dns_with(host: impl Into<String>, timeout: Duration, resolver: Arc<dyn Resolver>) -> Self {
        Check::DnsResolve {
            host: host.into(),
            timeout,
            resolver,
        }
    }

    /// Run the check.
    pub async fn run(&self) -> Result<(), HealthError> {
        match self {
            Check::TaskThreshold { max } => check_task_count(alive_tasks(), *max),
            Check::DnsResolve {
                host,
                timeout,
                resolver,
            } => resolve_within(resolver.as_ref(), host, *timeout).await,
        }
    }
}

/// Number of tasks currently alive on the current Tokio runtime.
///
/// Returns 0 outside a runtime.
pub fn alive_tasks() -> usize {
    tokio::runtime::Handle::try_current()
        .map(|handle| handle.metrics().num_alive_tasks())
        .unwrap_or(0)
}

/// Compare an observed task count against a threshold.
pub fn check_task_count(count: usize, max: usize) -> Result<(), HealthError> {
    if count > max {
        return Err(HealthError::TooManyTasks { count, max });
    }
    Ok(())
}

/// Resolve `host` and require at least one address within `timeout`.
pub async fn resolve_within(
    resolver: &dyn Resolver,
    host: &str,
    timeout: Duration,
) -> Result<(), HealthError> {
    match tokio::time::timeout(timeout, resolver.lookup(host)).await {
        Err(_) => Err(HealthError::DnsTimeout {
            host: host.to_string(),
            timeout,
        }),
        Ok(Err(e)) => Err(HealthError::DnsFailed {
            host: host.to_string(),
            reason: e.to_string(),
        }),
        Ok(Ok(addrs)) if addrs.is_empty() => Err(HealthError::NoAddresses {
            host: host.to_string(),
        }),
        Ok(Ok(_)) => Ok(()),
    }
}
