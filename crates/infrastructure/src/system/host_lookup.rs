use mc_resolver_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6) via the OS resolver.
pub async fn resolve_all(hostname: &str, timeout: Duration) -> Result<Vec<IpAddr>, DomainError> {
    // lookup_host needs a port; it does not affect the answer
    let target = format!("{}:0", hostname);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(target.as_str()))
        .await
        .map_err(|_| DomainError::QueryTimeout)?
        .map_err(|e| {
            DomainError::NoRecords(format!("System resolution failed for {}: {}", hostname, e))
        })?;

    let mut addrs: Vec<IpAddr> = Vec::new();
    for addr in addrs_iter {
        if !addrs.contains(&addr.ip()) {
            addrs.push(addr.ip());
        }
    }

    if addrs.is_empty() {
        return Err(DomainError::NoRecords(format!(
            "No addresses found for {}",
            hostname
        )));
    }

    Ok(addrs)
}
