use mc_resolver_domain::{CliOverrides, Config};
use tracing::{debug, error};

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    debug!(
        nameservers = config.resolver.nameservers.len(),
        default_port = config.resolver.default_port,
        probe = config.resolver.probe.enabled,
        status = config.resolver.probe.status,
        "Configuration loaded"
    );

    Ok(config)
}
