use crate::server_address::DEFAULT_GAME_PORT;
use crate::srv_record::SrvService;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Nameservers as `udp://IP:PORT`, `tcp://IP:PORT` or `IP[:PORT]`.
    /// Empty means "read /etc/resolv.conf".
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Per-query timeout in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Port used when the address does not carry one
    #[serde(default = "default_port")]
    pub default_port: u16,

    #[serde(default = "default_srv_service")]
    pub srv_service: String,

    #[serde(default = "default_srv_protocol")]
    pub srv_protocol: String,

    /// Pick an IPv4 address over IPv6 when a host has both
    #[serde(default = "default_true")]
    pub prefer_ipv4: bool,

    /// Resolve host names through the operating system instead of the nameservers.
    /// SRV lookups always go to the nameservers.
    #[serde(default)]
    pub use_system_resolver: bool,

    #[serde(default)]
    pub probe: ProbeConfig,
}

impl ResolverConfig {
    pub fn srv_service(&self) -> SrvService {
        SrvService::new(self.srv_service.clone(), self.srv_protocol.clone())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nameservers: Vec::new(),
            query_timeout_ms: default_query_timeout_ms(),
            default_port: default_port(),
            srv_service: default_srv_service(),
            srv_protocol: default_srv_protocol(),
            prefer_ipv4: true,
            use_system_resolver: false,
            probe: ProbeConfig::default(),
        }
    }
}

/// Checks run against the server after a successful resolution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// TCP connect to the resolved address
    #[serde(default)]
    pub enabled: bool,

    /// Status handshake reporting the online player count
    #[serde(default)]
    pub status: bool,

    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            status: false,
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_port() -> u16 {
    DEFAULT_GAME_PORT
}

fn default_srv_service() -> String {
    "_minecraft".to_string()
}

fn default_srv_protocol() -> String {
    "_tcp".to_string()
}

fn default_true() -> bool {
    true
}

fn default_probe_timeout_ms() -> u64 {
    3000
}
