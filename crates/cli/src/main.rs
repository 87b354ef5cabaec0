use clap::Parser;
use mc_resolver_domain::CliOverrides;
use std::process::ExitCode;
use tracing::{debug, error};

mod bootstrap;
mod di;
mod output;

#[derive(Parser)]
#[command(name = "mc-resolver")]
#[command(version)]
#[command(about = "Resolve a Minecraft server address via SRV and A/AAAA records")]
struct Cli {
    /// Server address as typed by a player: host, host:port, [v6]:port
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Port used when the address has none and no SRV record applies
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Nameserver to query (udp://ip:port, tcp://ip:port or ip[:port]); repeatable
    #[arg(short = 'n', long = "nameserver", value_name = "SERVER")]
    nameservers: Vec<String>,

    /// Per-query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Check that the resolved address accepts TCP connections
    #[arg(long)]
    probe: bool,

    /// Ask the resolved server for its status and report the online player count
    #[arg(long)]
    status: bool,

    /// Resolve host names with the operating system resolver
    #[arg(long)]
    system_resolver: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        default_port: cli.port,
        nameservers: (!cli.nameservers.is_empty()).then(|| cli.nameservers.clone()),
        query_timeout_ms: cli.timeout_ms,
        probe: cli.probe.then_some(true),
        status: cli.status.then_some(true),
        use_system_resolver: cli.system_resolver.then_some(true),
        log_level: cli.log_level.clone(),
        log_json: None,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    debug!("mc-resolver v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;

    let report = match dns_services.resolve_server.execute(&cli.address).await {
        Ok(report) => report,
        Err(e) => {
            error!(address = %cli.address, error = %e, "Resolution aborted");
            eprintln!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        println!("{}", output::render_json(&report)?);
    } else if report.outcome.is_resolved() {
        println!("{}", output::render_plain(&report));
    } else {
        eprintln!("{}", output::render_plain(&report));
    }

    Ok(if report.outcome.is_resolved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
