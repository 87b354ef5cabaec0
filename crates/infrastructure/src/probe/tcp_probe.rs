use async_trait::async_trait;
use mc_resolver_application::ports::ReachabilityProbe;
use mc_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::debug;

/// Confirms a resolved server accepts TCP connections.
pub struct TcpReachabilityProbe {
    timeout: Duration,
}

impl TcpReachabilityProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachabilityProbe {
    async fn probe(&self, addr: SocketAddr) -> Result<Duration, DomainError> {
        let start = Instant::now();

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| DomainError::ServerUnreachable {
                addr: addr.to_string(),
                reason: format!("no connection within {} ms", self.timeout.as_millis()),
            })?
            .map_err(|e| DomainError::ServerUnreachable {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        let latency = start.elapsed();
        drop(stream);

        debug!(addr = %addr, latency_ms = latency.as_millis() as u64, "TCP probe succeeded");
        Ok(latency)
    }
}
