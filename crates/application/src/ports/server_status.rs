use async_trait::async_trait;
use mc_resolver_domain::{DomainError, ServerStatus};
use std::net::SocketAddr;

/// Asks a game server for its status over the server list protocol.
#[async_trait]
pub trait ServerStatusPort: Send + Sync {
    /// `host` is the name announced in the handshake, `addr` the resolved
    /// address actually dialled.
    async fn query_status(&self, host: &str, addr: SocketAddr)
        -> Result<ServerStatus, DomainError>;
}
