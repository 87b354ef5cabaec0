use super::forwarding::{DnsResponse, ResponseParser};
use super::load_balancer::FailoverStrategy;
use crate::system::host_lookup;
use async_trait::async_trait;
use mc_resolver_application::ports::DnsLookupPort;
use mc_resolver_domain::{DnsProtocol, DomainError, RecordType, SrvRecord};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

const MAX_CNAME_DEPTH: usize = 8;

/// How host names (as opposed to SRV names) are turned into addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostLookupStrategy {
    /// A, then AAAA, against the configured nameservers
    #[default]
    Upstream,
    /// The operating system resolver (`getaddrinfo`), honoring /etc/hosts
    System,
}

/// [`DnsLookupPort`] backed by wire-level queries to a list of nameservers.
pub struct UpstreamDnsLookup {
    servers: Vec<DnsProtocol>,
    timeout: Duration,
    host_strategy: HostLookupStrategy,
    failover: FailoverStrategy,
}

impl UpstreamDnsLookup {
    pub fn new(servers: Vec<DnsProtocol>, timeout: Duration) -> Self {
        Self {
            servers,
            timeout,
            host_strategy: HostLookupStrategy::default(),
            failover: FailoverStrategy::new(),
        }
    }

    pub fn with_host_strategy(mut self, host_strategy: HostLookupStrategy) -> Self {
        self.host_strategy = host_strategy;
        self
    }

    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsResponse, DomainError> {
        let result = self
            .failover
            .query(&self.servers, name, &record_type, self.timeout)
            .await?;
        let response = result.response;
        debug!(
            name = %name,
            record_type = %record_type,
            server = %result.server,
            latency_ms = result.latency_ms,
            "Upstream query finished"
        );

        if response.is_nxdomain() {
            debug!(name = %name, record_type = %record_type, server = %result.server, "NXDOMAIN");
            return Err(DomainError::NxDomain);
        }
        if response.is_server_error() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} answered {} for {} {}",
                result.server,
                ResponseParser::rcode_to_status(response.rcode),
                record_type,
                name
            )));
        }

        Ok(response)
    }

    /// Addresses of one family, chasing CNAMEs the nameserver did not expand.
    async fn query_addresses(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let mut name = host.to_string();

        for _ in 0..MAX_CNAME_DEPTH {
            let response = self.query(&name, record_type).await?;
            if !response.addresses.is_empty() {
                return Ok(response.addresses);
            }
            match response.cname {
                Some(cname) => {
                    debug!(from = %name, to = %cname, "Following CNAME");
                    name = cname;
                }
                None => return Ok(Vec::new()),
            }
        }

        Err(DomainError::InvalidDnsResponse(format!(
            "CNAME chain for {} exceeds {} hops",
            host, MAX_CNAME_DEPTH
        )))
    }

    async fn lookup_host_upstream(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        let v4 = self.query_addresses(host, RecordType::A).await;
        match &v4 {
            Ok(addresses) if !addresses.is_empty() => return Ok(addresses.clone()),
            Err(DomainError::NxDomain) => return Err(DomainError::NxDomain),
            _ => {}
        }

        let v6 = self.query_addresses(host, RecordType::AAAA).await;
        match (v4, v6) {
            (_, Ok(addresses)) if !addresses.is_empty() => Ok(addresses),
            (Err(e), _) | (_, Err(e)) => Err(e),
            _ => Err(DomainError::NoRecords(format!(
                "No A/AAAA entries found for {}",
                host
            ))),
        }
    }
}

#[async_trait]
impl DnsLookupPort for UpstreamDnsLookup {
    async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>, DomainError> {
        let response = self.query(name, RecordType::SRV).await?;
        debug!(name = %name, records = response.srv_records.len(), "SRV lookup finished");
        Ok(response.srv_records)
    }

    async fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        match self.host_strategy {
            HostLookupStrategy::Upstream => self.lookup_host_upstream(host).await,
            HostLookupStrategy::System => host_lookup::resolve_all(host, self.timeout).await,
        }
    }
}
