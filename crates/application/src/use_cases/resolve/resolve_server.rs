use super::ServerAddressResolver;
use crate::ports::{DnsLookupPort, ReachabilityProbe, ServerStatusPort};
use mc_resolver_domain::{
    DomainError, ResolutionOutcome, ResolutionRequest, ServerAddress, ServerStatus, SrvService,
    DEFAULT_GAME_PORT,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub request: ResolutionRequest,
    pub outcome: ResolutionOutcome,
    pub elapsed: Duration,
    /// Connect time to the resolved address, when a probe ran and succeeded
    pub probe_latency: Option<Duration>,
    /// Status reported by the server, when a status query ran and succeeded
    pub status: Option<ServerStatus>,
}

/// Turns a typed server address into a [`ResolutionReport`], optionally
/// confirming that the resolved address accepts TCP connections and asking
/// the server for its status.
///
/// A failed check turns the outcome into [`ResolutionOutcome::Failed`].
pub struct ResolveServerUseCase {
    lookup: Arc<dyn DnsLookupPort>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    status_query: Option<Arc<dyn ServerStatusPort>>,
    default_port: u16,
    srv_service: SrvService,
    prefer_ipv4: bool,
}

impl ResolveServerUseCase {
    pub fn new(lookup: Arc<dyn DnsLookupPort>) -> Self {
        Self {
            lookup,
            probe: None,
            status_query: None,
            default_port: DEFAULT_GAME_PORT,
            srv_service: SrvService::minecraft(),
            prefer_ipv4: true,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_status_query(mut self, status_query: Arc<dyn ServerStatusPort>) -> Self {
        self.status_query = Some(status_query);
        self
    }

    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    pub fn with_srv_service(mut self, srv_service: SrvService) -> Self {
        self.srv_service = srv_service;
        self
    }

    pub fn with_ipv4_preference(mut self, prefer_ipv4: bool) -> Self {
        self.prefer_ipv4 = prefer_ipv4;
        self
    }

    pub async fn execute(&self, address: &str) -> Result<ResolutionReport, DomainError> {
        let start = Instant::now();
        let request = ServerAddress::parse(address)?.into_request(self.default_port)?;

        let resolver = ServerAddressResolver::new(Arc::clone(&self.lookup), request.clone())
            .with_srv_service(self.srv_service.clone())
            .with_ipv4_preference(self.prefer_ipv4);

        let outcome = resolver.resolve().await?;
        let (outcome, probe_latency) = self.probe_outcome(outcome).await;
        let (outcome, status) = self.status_outcome(request.domain(), outcome).await;

        let elapsed = start.elapsed();
        info!(
            request = %request,
            resolved = outcome.is_resolved(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Resolution finished"
        );

        Ok(ResolutionReport {
            request,
            outcome,
            elapsed,
            probe_latency,
            status,
        })
    }

    async fn probe_outcome(
        &self,
        outcome: ResolutionOutcome,
    ) -> (ResolutionOutcome, Option<Duration>) {
        let (Some(probe), ResolutionOutcome::Resolved(server)) = (&self.probe, &outcome) else {
            return (outcome, None);
        };

        let addr = server.socket_addr();
        match probe.probe(addr).await {
            Ok(latency) => {
                debug!(addr = %addr, latency_ms = latency.as_millis() as u64, "Server reachable");
                (outcome, Some(latency))
            }
            Err(e) => {
                warn!(addr = %addr, error = %e, "Resolved server is unreachable");
                (ResolutionOutcome::failed(e.to_string()), None)
            }
        }
    }

    async fn status_outcome(
        &self,
        host: &str,
        outcome: ResolutionOutcome,
    ) -> (ResolutionOutcome, Option<ServerStatus>) {
        let (Some(status_query), ResolutionOutcome::Resolved(server)) =
            (&self.status_query, &outcome)
        else {
            return (outcome, None);
        };

        let addr = server.socket_addr();
        match status_query.query_status(host, addr).await {
            Ok(status) => {
                debug!(
                    addr = %addr,
                    online = status.online_players,
                    latency_ms = status.latency.as_millis() as u64,
                    "Server status received"
                );
                (outcome, Some(status))
            }
            Err(e) => {
                warn!(addr = %addr, error = %e, "Server status query failed");
                (ResolutionOutcome::failed(e.to_string()), None)
            }
        }
    }
}
