use crate::ports::DnsLookupPort;
use mc_resolver_domain::{
    select_srv_record, DomainError, ResolutionOutcome, ResolutionRequest, ResolutionSource,
    ResolvedServer, ResolverState, SrvService,
};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Resolves one user-supplied server address into a connectable IP and port.
///
/// The SRV record `_minecraft._tcp.<domain>` is consulted first; when it is
/// absent or unusable the domain itself is looked up with the requested port.
/// Once an SRV record is selected its target must resolve: a target without
/// addresses fails the resolution instead of falling back to the domain.
/// Each instance runs at most one resolution: a second [`resolve`] call is
/// rejected with [`DomainError::ResolutionAlreadyStarted`] and issues no query.
///
/// [`resolve`]: ServerAddressResolver::resolve
pub struct ServerAddressResolver {
    lookup: Arc<dyn DnsLookupPort>,
    request: ResolutionRequest,
    srv_service: SrvService,
    prefer_ipv4: bool,
    state: AtomicU8,
    cancel: CancellationToken,
}

impl ServerAddressResolver {
    pub fn new(lookup: Arc<dyn DnsLookupPort>, request: ResolutionRequest) -> Self {
        Self {
            lookup,
            request,
            srv_service: SrvService::minecraft(),
            prefer_ipv4: true,
            state: AtomicU8::new(ResolverState::Idle.as_u8()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_srv_service(mut self, srv_service: SrvService) -> Self {
        self.srv_service = srv_service;
        self
    }

    pub fn with_ipv4_preference(mut self, prefer_ipv4: bool) -> Self {
        self.prefer_ipv4 = prefer_ipv4;
        self
    }

    /// Ties this resolver to an owner's token; cancelling it abandons the
    /// resolution without producing an outcome.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn request(&self) -> &ResolutionRequest {
        &self.request
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ResolverState {
        ResolverState::from_u8(self.state.load(Ordering::Acquire)).unwrap_or(ResolverState::Failed)
    }

    pub async fn resolve(&self) -> Result<ResolutionOutcome, DomainError> {
        self.begin()?;

        debug!(request = %self.request, "Resolving server address");

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            outcome = self.run() => Some(outcome),
        };

        match outcome {
            Some(outcome) => {
                let terminal = if outcome.is_resolved() {
                    ResolverState::Resolved
                } else {
                    ResolverState::Failed
                };
                self.set_state(terminal);
                Ok(outcome)
            }
            None => {
                self.set_state(ResolverState::Failed);
                debug!(request = %self.request, "Resolution cancelled");
                Err(DomainError::Cancelled)
            }
        }
    }

    /// Runs the resolution on the tokio runtime. The outcome is delivered
    /// exactly once through the returned handle.
    pub fn spawn(self) -> ResolutionHandle {
        let (tx, rx) = oneshot::channel();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = self.resolve().await;
            if tx.send(result).is_err() {
                debug!(request = %self.request, "Resolution handle dropped before completion");
            }
        });

        ResolutionHandle {
            receiver: rx,
            cancel,
        }
    }

    fn begin(&self) -> Result<(), DomainError> {
        self.state
            .compare_exchange(
                ResolverState::Idle.as_u8(),
                ResolverState::SrvLookupPending.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|_| DomainError::ResolutionAlreadyStarted)
    }

    fn set_state(&self, state: ResolverState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    async fn run(&self) -> ResolutionOutcome {
        let domain = self.request.domain();

        match self.resolve_via_srv(domain).await {
            SrvPhase::Resolved(server) => {
                info!(
                    domain = %domain,
                    ip = %server.ip,
                    port = server.port,
                    source = %server.source,
                    "Server address resolved"
                );
                return ResolutionOutcome::Resolved(server);
            }
            SrvPhase::Failed(reason) => return ResolutionOutcome::failed(reason),
            SrvPhase::Fallback => {}
        }

        self.set_state(ResolverState::ARecordLookupPending);
        self.resolve_direct(domain, self.request.port()).await
    }

    async fn resolve_via_srv(&self, domain: &str) -> SrvPhase {
        if self.request.is_ip_literal() {
            debug!(domain = %domain, "Address is an IP literal, skipping SRV lookup");
            return SrvPhase::Fallback;
        }

        let name = self.srv_service.query_name(domain);
        let records = match self.lookup.lookup_srv(&name).await {
            Ok(records) => records,
            Err(e) => {
                debug!(
                    name = %name,
                    error = %e,
                    "SRV record lookup failed, trying A record lookup"
                );
                return SrvPhase::Fallback;
            }
        };

        let Some(record) = select_srv_record(&records) else {
            debug!(name = %name, "No SRV entries found for domain, trying A record lookup");
            return SrvPhase::Fallback;
        };

        if record.is_service_unavailable() {
            debug!(name = %name, "SRV record marks service unavailable, trying A record lookup");
            return SrvPhase::Fallback;
        }

        debug!(
            name = %name,
            target = %record.target,
            port = record.port,
            priority = record.priority,
            weight = record.weight,
            candidates = records.len(),
            "SRV record selected"
        );

        match self.lookup_address(&record.target).await {
            Ok(ip) => SrvPhase::Resolved(ResolvedServer::new(
                ip,
                record.port,
                ResolutionSource::Srv {
                    target: record.target.as_str().into(),
                },
            )),
            Err(e) => {
                warn!(target = %record.target, error = %e, "SRV target lookup failed");
                SrvPhase::Failed(format!(
                    "SRV target {} lookup failed: {}",
                    record.target, e
                ))
            }
        }
    }

    async fn resolve_direct(&self, domain: &str, port: u16) -> ResolutionOutcome {
        match self.lookup_address(domain).await {
            Ok(ip) => {
                info!(domain = %domain, ip = %ip, port, "Server address resolved");
                ResolutionOutcome::Resolved(ResolvedServer::new(
                    ip,
                    port,
                    ResolutionSource::Direct,
                ))
            }
            Err(e) => {
                let reason = format!("A record lookup failed for {}: {}", domain, e);
                warn!(domain = %domain, error = %e, "Server address could not be resolved");
                ResolutionOutcome::failed(reason)
            }
        }
    }

    async fn lookup_address(&self, host: &str) -> Result<IpAddr, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }

        let addresses = self.lookup.lookup_host(host).await?;
        pick_address(&addresses, self.prefer_ipv4).ok_or_else(|| {
            DomainError::NoRecords(format!("No A/AAAA entries found for {}", host))
        })
    }
}

enum SrvPhase {
    Resolved(ResolvedServer),
    /// No usable SRV record; look the domain up directly
    Fallback,
    Failed(String),
}

fn pick_address(addresses: &[IpAddr], prefer_ipv4: bool) -> Option<IpAddr> {
    if prefer_ipv4 {
        if let Some(v4) = addresses.iter().find(|ip| ip.is_ipv4()) {
            return Some(*v4);
        }
    }
    addresses.first().copied()
}

/// Receiving side of a spawned resolution.
pub struct ResolutionHandle {
    receiver: oneshot::Receiver<Result<ResolutionOutcome, DomainError>>,
    cancel: CancellationToken,
}

impl ResolutionHandle {
    /// Abandons the resolution. [`wait`](Self::wait) then yields
    /// [`DomainError::Cancelled`] instead of an outcome.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn wait(self) -> Result<ResolutionOutcome, DomainError> {
        self.receiver.await.map_err(|_| DomainError::Cancelled)?
    }
}
