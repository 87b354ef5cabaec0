use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Where a resolved address came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// An SRV record pointed at `target`.
    Srv { target: Arc<str> },
    /// The domain itself was looked up (or was already an IP literal).
    Direct,
}

impl ResolutionSource {
    pub fn is_srv(&self) -> bool {
        matches!(self, ResolutionSource::Srv { .. })
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Srv { target } => write!(f, "SRV {}", target),
            ResolutionSource::Direct => f.write_str("direct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    pub ip: IpAddr,
    pub port: u16,
    pub source: ResolutionSource,
}

impl ResolvedServer {
    pub fn new(ip: IpAddr, port: u16, source: ResolutionSource) -> Self {
        Self { ip, port, source }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

/// Terminal result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(ResolvedServer),
    Failed { reason: String },
}

impl ResolutionOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        ResolutionOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&ResolvedServer> {
        match self {
            ResolutionOutcome::Resolved(server) => Some(server),
            ResolutionOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Failed { reason } => Some(reason),
            ResolutionOutcome::Resolved(_) => None,
        }
    }
}

/// Lifecycle of a single resolver instance.
///
/// `Idle -> SrvLookupPending -> {ARecordLookupPending | Resolved} -> Resolved | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResolverState {
    Idle = 0,
    SrvLookupPending = 1,
    ARecordLookupPending = 2,
    Resolved = 3,
    Failed = 4,
}

impl ResolverState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ResolverState::Idle),
            1 => Some(ResolverState::SrvLookupPending),
            2 => Some(ResolverState::ARecordLookupPending),
            3 => Some(ResolverState::Resolved),
            4 => Some(ResolverState::Failed),
            _ => None,
        }
    }
}
