use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("No records found: {0}")]
    NoRecords(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("No nameservers configured")]
    TransportNoNameservers,

    #[error("All nameservers are unreachable")]
    TransportAllServersUnreachable,

    #[error("Server {addr} unreachable: {reason}")]
    ServerUnreachable { addr: String, reason: String },

    #[error("Status query to {addr} failed: {reason}")]
    StatusQueryFailed { addr: String, reason: String },

    #[error("Resolution already started for this request")]
    ResolutionAlreadyStarted,

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
