//! Probe executor: one query per probe, one signature per response.

use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use dnsver_core::{IpSignatures, ProbeDefinition, Signature};
use hickory_proto::op::{Message, MessageType};

use crate::error::{ProbeError, ProbeResult};
use crate::extract::extract_signature;
use crate::query::build_query;
use crate::transport::{Transport, UdpTransport};

/// Standard DNS port
pub const DNS_PORT: u16 = 53;

/// Something that can fingerprint a target with a probe.
///
/// Implementations never fail: network and decoding problems are recorded
/// as failure markers in the returned signature.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Send one probe to `ip`
    async fn probe(&self, ip: IpAddr, probe: &ProbeDefinition) -> Signature;

    /// Send every probe to `ip`, one after another
    async fn probe_all(&self, ip: IpAddr, probes: &[ProbeDefinition]) -> IpSignatures {
        let mut entry = IpSignatures::new(ip);
        for probe in probes {
            let signature = self.probe(ip, probe).await;
            entry.signatures.insert(probe.name().to_string(), signature);
        }
        entry
    }
}

/// Retry policy for probes that time out or hit a socket error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Never retry
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the pause between attempts
    #[must_use]
    pub const fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Sends probes over a [`Transport`] and extracts signatures.
#[derive(Debug)]
pub struct Executor<T = UdpTransport> {
    transport: T,
    port: u16,
    timeout: Duration,
    retry: RetryPolicy,
    next_id: AtomicU16,
}

impl Executor<UdpTransport> {
    /// Executor sending plain UDP queries
    #[must_use]
    pub fn udp() -> Self {
        Self::new(UdpTransport::new())
    }
}

impl Default for Executor<UdpTransport> {
    fn default() -> Self {
        Self::udp()
    }
}

impl<T: Transport> Executor<T> {
    /// Create an executor with a 2 second timeout, no retries, port 53
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            port: DNS_PORT,
            timeout: Duration::from_secs(2),
            retry: RetryPolicy::none(),
            next_id: AtomicU16::new(initial_id()),
        }
    }

    /// Set the destination port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Send one probe, returning the error instead of a failure marker
    pub async fn try_probe(&self, ip: IpAddr, probe: &ProbeDefinition) -> ProbeResult<Signature> {
        let mut attempt = 0;
        loop {
            match self.exchange(ip, probe).await {
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    tracing::debug!(%ip, probe = %probe, attempt, error = %e, "retrying probe");
                    if !self.retry.backoff.is_zero() {
                        tokio::time::sleep(self.retry.backoff).await;
                    }
                }
                result => return result,
            }
        }
    }

    async fn exchange(&self, ip: IpAddr, probe: &ProbeDefinition) -> ProbeResult<Signature> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build_query(probe, id)?
            .to_vec()
            .map_err(|e| ProbeError::Encode(e.to_string()))?;

        let raw = self
            .transport
            .exchange(SocketAddr::new(ip, self.port), &request, self.timeout)
            .await?;

        let response = Message::from_vec(&raw).map_err(|e| ProbeError::Decode(e.to_string()))?;
        if response.id() != id || response.message_type() != MessageType::Response {
            return Err(ProbeError::Mismatch {
                expected: id,
                actual: response.id(),
            });
        }

        Ok(extract_signature(&response))
    }
}

#[async_trait]
impl<T: Transport> Prober for Executor<T> {
    async fn probe(&self, ip: IpAddr, probe: &ProbeDefinition) -> Signature {
        match self.try_probe(ip, probe).await {
            Ok(signature) => signature,
            Err(e) => {
                tracing::debug!(%ip, probe = %probe, error = %e, "probe failed");
                Signature::failure(e.failure())
            }
        }
    }
}

// Start ids at a time-derived offset so consecutive runs do not reuse them.
fn initial_id() -> u16 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u16::try_from(d.subsec_nanos() & 0xFFFF).unwrap_or_default())
}
