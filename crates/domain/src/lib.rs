//! Minecraft server address resolver - domain layer
pub mod config;
pub mod dns_protocol;
pub mod errors;
pub mod record_type;
pub mod resolution;
pub mod server_address;
pub mod server_status;
pub mod srv_record;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ProbeConfig, ResolverConfig};
pub use dns_protocol::DnsProtocol;
pub use errors::DomainError;
pub use record_type::RecordType;
pub use resolution::{ResolutionOutcome, ResolutionSource, ResolvedServer, ResolverState};
pub use server_address::{ResolutionRequest, ServerAddress, DEFAULT_GAME_PORT};
pub use server_status::{ServerStatus, STATUS_PROTOCOL_VERSION};
pub use srv_record::{select_srv_record, SrvRecord, SrvService};
