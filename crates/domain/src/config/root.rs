use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use crate::dns_protocol::DnsProtocol;

const LOCAL_CONFIG_PATH: &str = "mc-resolver.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/mc-resolver/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolution behaviour (nameservers, timeouts, SRV service, probe)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. mc-resolver.toml in current directory
    /// 3. /etc/mc-resolver/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::FileRead {
                path: path.to_string(),
                source,
            })?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.default_port {
            self.resolver.default_port = port;
        }
        if let Some(nameservers) = overrides.nameservers {
            self.resolver.nameservers = nameservers;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.resolver.query_timeout_ms = timeout;
        }
        if let Some(probe) = overrides.probe {
            self.resolver.probe.enabled = probe;
        }
        if let Some(status) = overrides.status {
            self.resolver.probe.status = status;
        }
        if let Some(system) = overrides.use_system_resolver {
            self.resolver.use_system_resolver = system;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = json;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.default_port == 0 {
            return Err(ConfigError::Validation(
                "Default port cannot be 0".to_string(),
            ));
        }

        if resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout must be greater than 0".to_string(),
            ));
        }

        if (resolver.probe.enabled || resolver.probe.status) && resolver.probe.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Probe timeout must be greater than 0".to_string(),
            ));
        }

        for (field, value) in [
            ("srv_service", &resolver.srv_service),
            ("srv_protocol", &resolver.srv_protocol),
        ] {
            if !value.starts_with('_') || value.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "{} must be an underscore label like '_minecraft', got '{}'",
                    field, value
                )));
            }
        }

        for server in &resolver.nameservers {
            server
                .parse::<DnsProtocol>()
                .map_err(|reason| ConfigError::nameserver(server, reason))?;
        }

        Ok(())
    }

    /// Parsed nameservers, in configured order
    pub fn nameservers(&self) -> Result<Vec<DnsProtocol>, ConfigError> {
        self.resolver
            .nameservers
            .iter()
            .map(|s| {
                s.parse::<DnsProtocol>()
                    .map_err(|reason| ConfigError::nameserver(s, reason))
            })
            .collect()
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .map_err(|source| ConfigError::FileWrite {
                path: path.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub default_port: Option<u16>,
    pub nameservers: Option<Vec<String>>,
    pub query_timeout_ms: Option<u64>,
    pub probe: Option<bool>,
    pub status: Option<bool>,
    pub use_system_resolver: Option<bool>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}
