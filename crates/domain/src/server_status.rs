use std::time::Duration;

/// Protocol version announced in the status handshake. Servers answer a
/// status request regardless of whether they speak this version.
pub const STATUS_PROTOCOL_VERSION: i32 = 0x760;

/// What a server reported in its status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub online_players: u32,
    pub max_players: Option<u32>,
    /// Version name as advertised, e.g. `"1.20.4"` or a proxy's own label
    pub version: Option<String>,
    /// Connect plus request/response round trip
    pub latency: Duration,
}
