#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Cannot write config file {path}: {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid nameserver '{value}': {reason}")]
    Nameserver { value: String, reason: String },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn nameserver(value: &str, reason: String) -> Self {
        Self::Nameserver {
            value: value.to_string(),
            reason,
        }
    }
}
