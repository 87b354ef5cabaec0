//! Nameserver transports. UDP carries plain queries; TCP serves `tcp://`
//! nameservers and the retry of truncated UDP answers.

pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use mc_resolver_domain::{DnsProtocol, DomainError};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
    pub protocol: &'static str,
}

/// One query/response exchange with a single nameserver.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn exchange(
        &self,
        query: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn server_addr(&self) -> SocketAddr;
}

pub fn transport_for(protocol: &DnsProtocol) -> Box<dyn DnsTransport> {
    match *protocol {
        DnsProtocol::Udp { addr } => Box::new(udp::UdpTransport::new(addr)),
        DnsProtocol::Tcp { addr } => Box::new(tcp::TcpTransport::new(addr)),
    }
}

/// Runs one I/O step under `timeout`, mapping both the deadline and the
/// I/O error to transport errors that name the nameserver.
pub(crate) async fn io_step<T, F>(
    server: SocketAddr,
    timeout: Duration,
    step: &str,
    future: F,
) -> Result<T, DomainError>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(io_error(server, step, e)),
        Err(_) => Err(DomainError::TransportTimeout {
            server: server.to_string(),
        }),
    }
}

fn io_error(server: SocketAddr, step: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        _ => DomainError::TransportError(format!("{} {} failed: {}", step, server, e)),
    }
}
