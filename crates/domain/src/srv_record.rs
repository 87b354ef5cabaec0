use std::fmt;

/// One SRV answer: where a service lives and how to rank it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl SrvRecord {
    pub fn new(priority: u16, weight: u16, port: u16, target: impl Into<String>) -> Self {
        let target = target.into();
        let target = match target.strip_suffix('.') {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => target,
        };
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// RFC 2782: a target of "." means the service is decidedly not available.
    pub fn is_service_unavailable(&self) -> bool {
        self.target.is_empty() || self.target == "."
    }
}

impl fmt::Display for SrvRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

/// Picks the record to connect to: lowest priority, then highest weight.
/// Among records equal on both, the first one in answer order wins.
pub fn select_srv_record(records: &[SrvRecord]) -> Option<&SrvRecord> {
    let mut best: Option<&SrvRecord> = None;
    for record in records {
        best = match best {
            None => Some(record),
            Some(current)
                if record.priority < current.priority
                    || (record.priority == current.priority && record.weight > current.weight) =>
            {
                Some(record)
            }
            keep => keep,
        };
    }
    best
}

/// The `_service._proto` pair an SRV lookup is made under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvService {
    pub service: String,
    pub protocol: String,
}

impl SrvService {
    pub fn new(service: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            protocol: protocol.into(),
        }
    }

    pub fn minecraft() -> Self {
        Self::new("_minecraft", "_tcp")
    }

    pub fn query_name(&self, domain: &str) -> String {
        format!("{}.{}.{}", self.service, self.protocol, domain)
    }
}

impl Default for SrvService {
    fn default() -> Self {
        Self::minecraft()
    }
}
