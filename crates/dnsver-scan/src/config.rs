//! Scan configuration.

use std::time::Duration;

use dnsver_core::{DnsverError, Result};
use dnsver_probe::executor::DNS_PORT;
use dnsver_probe::{Executor, RetryPolicy, Transport};

/// Default worker bound, also the chunk size
pub const DEFAULT_WORKERS: usize = 100;

/// Default per-probe timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Orchestrator and executor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Concurrent targets per chunk, and lines read per chunk
    pub workers: usize,
    /// Timeout per probe attempt
    pub timeout: Duration,
    /// Retries for timed-out or failed probes
    pub retry: RetryPolicy,
    /// Destination port of probes
    pub port: u16,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
            port: DNS_PORT,
        }
    }
}

impl ScanConfig {
    /// Set the worker bound
    #[must_use]
    pub const fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the per-probe timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries per probe
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retry = self.retry.max_retries(retries);
        self
    }

    /// Set the destination port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DnsverError::Config("worker count must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(DnsverError::Config("probe timeout must be positive".into()));
        }
        Ok(())
    }

    /// Build an executor over `transport` with these settings
    #[must_use]
    pub fn executor<T: Transport>(&self, transport: T) -> Executor<T> {
        Executor::new(transport)
            .port(self.port)
            .timeout(self.timeout)
            .retry(self.retry)
    }
}
