use mc_resolver_domain::{DnsProtocol, DomainError};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::fs;
use tracing::{debug, warn};

pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// Public resolvers used when the system has none configured.
pub fn fallback_nameservers() -> Vec<DnsProtocol> {
    vec![
        DnsProtocol::Udp {
            addr: SocketAddr::from((Ipv4Addr::new(1, 1, 1, 1), 53)),
        },
        DnsProtocol::Udp {
            addr: SocketAddr::from((Ipv4Addr::new(8, 8, 8, 8), 53)),
        },
    ]
}

/// Reads `nameserver` entries from resolv.conf
pub struct ResolvConfReader {
    path: String,
}

impl ResolvConfReader {
    pub fn new() -> Self {
        Self {
            path: RESOLV_CONF_PATH.to_string(),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read_nameservers(&self) -> Result<Vec<DnsProtocol>, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::ConfigError(format!("Failed to read {}: {}", self.path, e))
        })?;

        let servers = Self::parse(&content);
        debug!(path = %self.path, count = servers.len(), "Nameservers loaded");
        Ok(servers)
    }

    /// Configured nameservers, or the fallback list if the file is missing or lists none.
    pub async fn read_or_fallback(&self) -> Vec<DnsProtocol> {
        match self.read_nameservers().await {
            Ok(servers) if !servers.is_empty() => servers,
            Ok(_) => {
                warn!(path = %self.path, "No nameservers configured, using public resolvers");
                fallback_nameservers()
            }
            Err(e) => {
                warn!(error = %e, "Using public resolvers");
                fallback_nameservers()
            }
        }
    }

    // Format:
    // # comment
    // nameserver 192.168.1.1
    // nameserver fe80::1%eth0
    pub fn parse(content: &str) -> Vec<DnsProtocol> {
        let mut servers = Vec::new();

        for line in content.lines() {
            let line = line.split(['#', ';']).next().unwrap_or("").trim();
            let mut fields = line.split_whitespace();
            if fields.next() != Some("nameserver") {
                continue;
            }
            let Some(addr) = fields.next() else {
                continue;
            };
            if addr.contains('%') {
                debug!(addr = %addr, "Skipping scoped nameserver address");
                continue;
            }
            match addr.parse::<DnsProtocol>() {
                Ok(server) => servers.push(server),
                Err(e) => warn!(addr = %addr, error = %e, "Ignoring invalid nameserver"),
            }
        }

        servers
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new()
    }
}
