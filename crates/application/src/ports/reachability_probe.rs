use async_trait::async_trait;
use mc_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Returns the time it took to establish a connection to `addr`.
    async fn probe(&self, addr: SocketAddr) -> Result<Duration, DomainError>;
}
