//! Network seam for probe exchanges.

use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::error::{ProbeError, ProbeResult};

/// Largest response read from the socket
const MAX_RESPONSE: usize = 4096;

/// Sends one wire-format query and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Exchange a single query with `server`, giving up after `timeout`
    async fn exchange(
        &self,
        server: SocketAddr,
        request: &[u8],
        timeout: Duration,
    ) -> ProbeResult<Vec<u8>>;
}

/// One fresh UDP socket per exchange.
///
/// No socket state is shared between targets or probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpTransport;

impl UdpTransport {
    /// Create a UDP transport
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        request: &[u8],
        timeout: Duration,
    ) -> ProbeResult<Vec<u8>> {
        let local: SocketAddr = match server.ip() {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let exchange = async {
            let socket = UdpSocket::bind(local).await?;
            socket.connect(server).await?;
            socket.send(request).await?;

            let mut buf = vec![0_u8; MAX_RESPONSE];
            let n = socket.recv(&mut buf).await?;
            buf.truncate(n);
            Ok::<_, std::io::Error>(buf)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ProbeError::Network(e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}
