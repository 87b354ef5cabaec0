//! DNS over UDP (RFC 1035 §4.2.1): one datagram each way, no framing.
//! Replies are matched to the query by transaction ID until the deadline.

use super::{io_step, DnsTransport, TransportResponse};
use async_trait::async_trait;
use mc_resolver_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::debug;

/// Large enough for EDNS(0) answers; classic servers stay under 512 bytes
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn local_addr(&self) -> SocketAddr {
        match self.server_addr {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(
        &self,
        query: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let socket = UdpSocket::bind(self.local_addr())
            .await
            .map_err(|e| DomainError::TransportError(format!("Failed to bind UDP socket: {}", e)))?;

        // A connected socket drops datagrams from other sources and surfaces
        // ICMP port-unreachable as ConnectionRefused.
        io_step(server, timeout, "connect to", socket.connect(server)).await?;
        io_step(server, timeout, "send to", socket.send(query)).await?;

        let deadline = Instant::now() + timeout;
        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let len = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let len = io_step(server, remaining, "recv from", socket.recv(&mut buf)).await?;
            // Datagrams carrying another transaction ID are stale or spoofed.
            if len >= 2 && query.len() >= 2 && buf[..2] == query[..2] {
                break len;
            }
            debug!(server = %server, received = len, "Dropping UDP datagram with mismatched ID");
        };
        buf.truncate(len);

        debug!(server = %server, sent = query.len(), received = len, "UDP exchange complete");

        Ok(TransportResponse {
            bytes: buf,
            protocol: "UDP",
        })
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}
