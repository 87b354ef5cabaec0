use mc_resolver_application::ports::{DnsLookupPort, ReachabilityProbe, ServerStatusPort};
use mc_resolver_application::use_cases::ResolveServerUseCase;
use mc_resolver_domain::{Config, DnsProtocol};
use mc_resolver_infrastructure::dns::{HostLookupStrategy, UpstreamDnsLookup};
use mc_resolver_infrastructure::probe::TcpReachabilityProbe;
use mc_resolver_infrastructure::status::StatusQueryClient;
use mc_resolver_infrastructure::system::ResolvConfReader;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub resolve_server: Arc<ResolveServerUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let nameservers = Self::setup_nameservers(config).await?;
        let timeout = Duration::from_millis(config.resolver.query_timeout_ms);

        let host_strategy = if config.resolver.use_system_resolver {
            HostLookupStrategy::System
        } else {
            HostLookupStrategy::Upstream
        };

        info!(
            nameservers = %nameservers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            host_strategy = ?host_strategy,
            timeout_ms = config.resolver.query_timeout_ms,
            "DNS lookup configured"
        );

        let lookup: Arc<dyn DnsLookupPort> = Arc::new(
            UpstreamDnsLookup::new(nameservers, timeout).with_host_strategy(host_strategy),
        );

        let check_timeout = Duration::from_millis(config.resolver.probe.timeout_ms);
        let probe = config.resolver.probe.enabled.then(|| {
            Arc::new(TcpReachabilityProbe::new(check_timeout)) as Arc<dyn ReachabilityProbe>
        });
        let status_query = config.resolver.probe.status.then(|| {
            Arc::new(StatusQueryClient::new(check_timeout)) as Arc<dyn ServerStatusPort>
        });

        let mut use_case = ResolveServerUseCase::new(lookup)
            .with_default_port(config.resolver.default_port)
            .with_srv_service(config.resolver.srv_service())
            .with_ipv4_preference(config.resolver.prefer_ipv4);
        if let Some(probe) = probe {
            use_case = use_case.with_probe(probe);
        }
        if let Some(status_query) = status_query {
            use_case = use_case.with_status_query(status_query);
        }

        Ok(Self {
            resolve_server: Arc::new(use_case),
        })
    }

    async fn setup_nameservers(config: &Config) -> anyhow::Result<Vec<DnsProtocol>> {
        let configured = config.nameservers()?;
        if !configured.is_empty() {
            return Ok(configured);
        }

        Ok(ResolvConfReader::new().read_or_fallback().await)
    }
}
