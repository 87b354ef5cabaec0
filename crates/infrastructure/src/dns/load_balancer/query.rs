use crate::dns::forwarding::{DnsQuery, DnsResponse, ResponseParser};
use crate::dns::transport::{transport_for, DnsTransport};
use mc_resolver_domain::{DnsProtocol, DomainError, RecordType};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a single-server query attempt
pub struct QueryAttemptResult {
    pub response: DnsResponse,
    pub server_addr: SocketAddr,
    pub protocol_used: &'static str,
    pub latency_ms: u64,
}

/// Queries one nameserver: build, exchange, parse, check the ID.
///
/// A truncated UDP answer is retried over TCP with the same query, within
/// what is left of `timeout`.
pub async fn query_server(
    protocol: &DnsProtocol,
    domain: &str,
    record_type: &RecordType,
    timeout: Duration,
) -> Result<QueryAttemptResult, DomainError> {
    let start = Instant::now();
    let query = DnsQuery::new(domain, *record_type)?;

    let (mut response, mut protocol_used) =
        exchange(transport_for(protocol).as_ref(), &query, timeout).await?;

    if response.truncated {
        if let DnsProtocol::Udp { addr } = protocol {
            debug!(server = %addr, domain = %domain, "Response truncated (TC bit), retrying via TCP");

            let remaining = remaining_budget(start, timeout)?;
            (response, protocol_used) =
                exchange(transport_for(&protocol.as_tcp()).as_ref(), &query, remaining).await?;
        }
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    debug!(
        server = %protocol,
        domain = %domain,
        record_type = %record_type,
        rcode = ResponseParser::rcode_to_status(response.rcode),
        latency_ms,
        "Nameserver answered"
    );

    Ok(QueryAttemptResult {
        response,
        server_addr: protocol.socket_addr(),
        protocol_used,
        latency_ms,
    })
}

/// What is left of `timeout` since `start`; an exhausted budget is a query timeout.
fn remaining_budget(start: Instant, timeout: Duration) -> Result<Duration, DomainError> {
    timeout
        .checked_sub(start.elapsed())
        .filter(|remaining| !remaining.is_zero())
        .ok_or(DomainError::QueryTimeout)
}

async fn exchange(
    transport: &dyn DnsTransport,
    query: &DnsQuery,
    timeout: Duration,
) -> Result<(DnsResponse, &'static str), DomainError> {
    let reply = transport.exchange(query.as_bytes(), timeout).await?;
    let response = ResponseParser::parse(&reply.bytes)?;
    query.check_response(&response)?;
    Ok((response, reply.protocol))
}
