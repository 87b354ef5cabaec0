use async_trait::async_trait;
use mc_resolver_application::ports::{DnsLookupPort, ReachabilityProbe, ServerStatusPort};
use mc_resolver_domain::{DomainError, ServerStatus, SrvRecord};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    Srv(String),
    Host(String),
}

/// In-memory DNS backend. Unknown names answer NXDOMAIN.
#[derive(Clone, Default)]
pub struct MockDnsLookup {
    srv: Arc<RwLock<HashMap<String, Result<Vec<SrvRecord>, DomainError>>>>,
    hosts: Arc<RwLock<HashMap<String, Result<Vec<IpAddr>, DomainError>>>>,
    calls: Arc<RwLock<Vec<LookupCall>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockDnsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_srv(&self, name: &str, records: Vec<SrvRecord>) {
        self.srv
            .write()
            .unwrap()
            .insert(name.to_string(), Ok(records));
    }

    pub fn set_srv_error(&self, name: &str, error: DomainError) {
        self.srv
            .write()
            .unwrap()
            .insert(name.to_string(), Err(error));
    }

    pub fn set_host(&self, host: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.hosts
            .write()
            .unwrap()
            .insert(host.to_string(), Ok(ips));
    }

    pub fn set_host_error(&self, host: &str, error: DomainError) {
        self.hosts
            .write()
            .unwrap()
            .insert(host.to_string(), Err(error));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    async fn pause(&self) {
        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DnsLookupPort for MockDnsLookup {
    async fn lookup_srv(&self, name: &str) -> Result<Vec<SrvRecord>, DomainError> {
        self.calls
            .write()
            .unwrap()
            .push(LookupCall::Srv(name.to_string()));
        self.pause().await;
        self.srv
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(Err(DomainError::NxDomain))
    }

    async fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.calls
            .write()
            .unwrap()
            .push(LookupCall::Host(host.to_string()));
        self.pause().await;
        self.hosts
            .read()
            .unwrap()
            .get(host)
            .cloned()
            .unwrap_or(Err(DomainError::NxDomain))
    }
}

pub struct MockReachabilityProbe {
    reachable: bool,
    probed: Arc<RwLock<Vec<SocketAddr>>>,
}

impl MockReachabilityProbe {
    pub fn reachable() -> Self {
        Self {
            reachable: true,
            probed: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            probed: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn probed(&self) -> Vec<SocketAddr> {
        self.probed.read().unwrap().clone()
    }
}

#[async_trait]
impl ReachabilityProbe for MockReachabilityProbe {
    async fn probe(&self, addr: SocketAddr) -> Result<Duration, DomainError> {
        self.probed.write().unwrap().push(addr);
        if self.reachable {
            Ok(Duration::from_millis(12))
        } else {
            Err(DomainError::ServerUnreachable {
                addr: addr.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }
}

/// Status backend answering with a fixed player count, or failing.
pub struct MockServerStatus {
    online_players: Option<u32>,
    queried: Arc<RwLock<Vec<(String, SocketAddr)>>>,
}

impl MockServerStatus {
    pub fn online(players: u32) -> Self {
        Self {
            online_players: Some(players),
            queried: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            online_players: None,
            queried: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn queried(&self) -> Vec<(String, SocketAddr)> {
        self.queried.read().unwrap().clone()
    }
}

#[async_trait]
impl ServerStatusPort for MockServerStatus {
    async fn query_status(
        &self,
        host: &str,
        addr: SocketAddr,
    ) -> Result<ServerStatus, DomainError> {
        self.queried.write().unwrap().push((host.to_string(), addr));
        match self.online_players {
            Some(online_players) => Ok(ServerStatus {
                online_players,
                max_players: Some(20),
                version: Some("1.20.4".to_string()),
                latency: Duration::from_millis(30),
            }),
            None => Err(DomainError::StatusQueryFailed {
                addr: addr.to_string(),
                reason: "unexpected packet id 0x01".to_string(),
            }),
        }
    }
}
