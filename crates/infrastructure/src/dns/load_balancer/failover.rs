use super::query::query_server;
use crate::dns::forwarding::{DnsResponse, ResponseParser};
use mc_resolver_domain::{DnsProtocol, DomainError, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

pub struct UpstreamResult {
    pub response: DnsResponse,
    pub server: SocketAddr,
    pub latency_ms: u64,
}

/// Tries nameservers in configured order until one gives a usable answer.
///
/// Transport failures and SERVFAIL/REFUSED answers move on to the next
/// server. When every server answered with an error code, the last such
/// answer is returned so the caller can report it.
pub struct FailoverStrategy;

impl FailoverStrategy {
    pub fn new() -> Self {
        Self
    }

    pub async fn query(
        &self,
        servers: &[DnsProtocol],
        domain: &str,
        record_type: &RecordType,
        timeout: Duration,
    ) -> Result<UpstreamResult, DomainError> {
        if servers.is_empty() {
            return Err(DomainError::TransportNoNameservers);
        }
        debug!(strategy = "failover", servers = servers.len(), domain = %domain, "Trying sequentially");

        let mut last_error_answer: Option<UpstreamResult> = None;

        for (index, protocol) in servers.iter().enumerate() {
            match query_server(protocol, domain, record_type, timeout).await {
                Ok(r) if r.response.is_server_error() => {
                    warn!(
                        server = %protocol,
                        rcode = ResponseParser::rcode_to_status(r.response.rcode),
                        position = index,
                        "Nameserver returned an error code, failing over"
                    );
                    last_error_answer = Some(UpstreamResult {
                        response: r.response,
                        server: r.server_addr,
                        latency_ms: r.latency_ms,
                    });
                }
                Ok(r) => {
                    debug!(server = %r.server_addr, protocol = r.protocol_used, latency_ms = r.latency_ms, position = index, "Server responded");
                    return Ok(UpstreamResult {
                        response: r.response,
                        server: r.server_addr,
                        latency_ms: r.latency_ms,
                    });
                }
                Err(e) => {
                    warn!(server = %protocol, error = %e, position = index, "Failing over");
                }
            }
        }

        last_error_answer.ok_or(DomainError::TransportAllServersUnreachable)
    }
}

impl Default for FailoverStrategy {
    fn default() -> Self {
        Self::new()
    }
}
