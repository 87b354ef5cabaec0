use async_trait::async_trait;
use mc_resolver_domain::{DomainError, SrvRecord};
use std::net::IpAddr;

/// DNS capability the resolver is driven by.
///
/// Implementations must be safe to share between concurrent resolutions.
#[async_trait]
pub trait DnsLookupPort: Send + Sync {
    /// SRV records published under `name`, in answer order.
    /// An empty vector means the name exists but has no SRV data.
    async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>, DomainError>;

    /// A/AAAA addresses of `host`, in answer order.
    async fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DomainError>;
}
