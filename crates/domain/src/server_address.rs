use super::DomainError;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Port a Java Edition server listens on unless told otherwise.
pub const DEFAULT_GAME_PORT: u16 = 25565;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A validated `(domain, port)` pair handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionRequest {
    domain: Arc<str>,
    port: u16,
}

impl ResolutionRequest {
    /// Port `0` selects [`DEFAULT_GAME_PORT`].
    pub fn new(domain: &str, port: u16) -> Result<Self, DomainError> {
        let domain = normalize_domain(domain)?;
        let port = if port == 0 { DEFAULT_GAME_PORT } else { port };
        Ok(Self {
            domain: domain.into(),
            port,
        })
    }

    /// Accepts a port from an untyped source such as a form field.
    pub fn with_raw_port(domain: &str, port: i64) -> Result<Self, DomainError> {
        let port = u16::try_from(port)
            .map_err(|_| DomainError::InvalidPort(format!("{} is outside 0-65535", port)))?;
        Self::new(domain, port)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ip_literal(&self) -> bool {
        self.domain.parse::<IpAddr>().is_ok()
    }
}

impl fmt::Display for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.domain.contains(':') {
            write!(f, "[{}]:{}", self.domain, self.port)
        } else {
            write!(f, "{}:{}", self.domain, self.port)
        }
    }
}

fn normalize_domain(domain: &str) -> Result<String, DomainError> {
    let trimmed = domain.trim();
    if trimmed.parse::<IpAddr>().is_ok() {
        return Ok(trimmed.to_string());
    }

    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "domain must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_DOMAIN_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "domain exceeds {} characters",
            MAX_DOMAIN_LEN
        )));
    }
    if trimmed.chars().any(|c| c.is_whitespace() || c == '/' || c == ':') {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' contains invalid characters",
            trimmed
        )));
    }
    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' contains an empty label",
                trimmed
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' exceeds {} characters",
                label, MAX_LABEL_LEN
            )));
        }
    }

    Ok(trimmed.to_ascii_lowercase())
}

/// A server address as typed by a user: `host`, `host:port`, `[v6]:port`
/// or a bare IPv6 literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: Option<u16>,
}

impl ServerAddress {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        input.parse()
    }

    /// Builds a request, using `default_port` when the address carried none.
    pub fn into_request(self, default_port: u16) -> Result<ResolutionRequest, DomainError> {
        ResolutionRequest::new(&self.host, self.port.unwrap_or(default_port))
    }
}

fn parse_port(port_str: &str) -> Result<u16, DomainError> {
    match port_str.parse::<u16>() {
        Ok(0) | Err(_) => Err(DomainError::InvalidPort(format!(
            "'{}' is not a valid port (1-65535)",
            port_str
        ))),
        Ok(port) => Ok(port),
    }
}

impl FromStr for ServerAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "server address must not be empty".to_string(),
            ));
        }

        if let Some(rest) = s.strip_prefix('[') {
            let end = rest.find(']').ok_or_else(|| {
                DomainError::InvalidIpAddress(format!("unterminated IPv6 literal in '{}'", s))
            })?;
            let host = &rest[..end];
            host.parse::<IpAddr>()
                .map_err(|e| DomainError::InvalidIpAddress(format!("'{}': {}", host, e)))?;
            let port = match &rest[end + 1..] {
                "" => None,
                tail => {
                    let port_str = tail.strip_prefix(':').ok_or_else(|| {
                        DomainError::InvalidPort(format!("unexpected '{}' after IPv6 literal", tail))
                    })?;
                    Some(parse_port(port_str)?)
                }
            };
            return Ok(Self {
                host: host.to_string(),
                port,
            });
        }

        if s.matches(':').count() > 1 {
            return s
                .parse::<IpAddr>()
                .map(|_| Self {
                    host: s.to_string(),
                    port: None,
                })
                .map_err(|_| {
                    DomainError::InvalidIpAddress(format!(
                        "'{}' has multiple ':' but is not an IPv6 literal",
                        s
                    ))
                });
        }

        match s.rsplit_once(':') {
            Some((host, port_str)) => Ok(Self {
                host: host.to_string(),
                port: Some(parse_port(port_str)?),
            }),
            None => Ok(Self {
                host: s.to_string(),
                port: None,
            }),
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host.contains(':'), self.port) {
            (true, Some(port)) => write!(f, "[{}]:{}", self.host, port),
            (false, Some(port)) => write!(f, "{}:{}", self.host, port),
            (_, None) => f.write_str(&self.host),
        }
    }
}
