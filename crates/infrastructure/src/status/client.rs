use super::codec::{self, STATUS_RESPONSE_ID};
use async_trait::async_trait;
use mc_resolver_application::ports::ServerStatusPort;
use mc_resolver_domain::{DomainError, ServerStatus, STATUS_PROTOCOL_VERSION};
use serde::Deserialize;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::debug;

/// Status query over the server list protocol: handshake, status request,
/// one JSON response.
pub struct StatusQueryClient {
    timeout: Duration,
}

impl StatusQueryClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn exchange(&self, host: &str, addr: SocketAddr) -> io::Result<Vec<u8>> {
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let handshake = codec::handshake(STATUS_PROTOCOL_VERSION, host, addr.port());
        codec::write_packet(&mut stream, &handshake).await?;
        codec::write_packet(&mut stream, &codec::status_request()).await?;

        let (id, payload) = codec::read_packet(&mut stream).await?;
        if id != STATUS_RESPONSE_ID {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected packet id 0x{:02x}", id),
            ));
        }
        Ok(payload)
    }
}

#[async_trait]
impl ServerStatusPort for StatusQueryClient {
    async fn query_status(
        &self,
        host: &str,
        addr: SocketAddr,
    ) -> Result<ServerStatus, DomainError> {
        let start = Instant::now();
        let failed = |reason: String| DomainError::StatusQueryFailed {
            addr: addr.to_string(),
            reason,
        };

        let payload = tokio::time::timeout(self.timeout, self.exchange(host, addr))
            .await
            .map_err(|_| failed(format!("no response within {} ms", self.timeout.as_millis())))?
            .map_err(|e| failed(e.to_string()))?;
        let latency = start.elapsed();

        let response = parse_status(&payload).map_err(|e| failed(e.to_string()))?;
        debug!(
            addr = %addr,
            online = response.players.online,
            version = ?response.version.as_ref().map(|v| &v.name),
            latency_ms = latency.as_millis() as u64,
            "Status response parsed"
        );

        Ok(ServerStatus {
            online_players: response.players.online,
            max_players: response.players.max,
            version: response.version.map(|v| v.name),
            latency,
        })
    }
}

/// The parts of the status JSON this client reads. Description, favicon and
/// player samples are ignored.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    players: Players,
    #[serde(default)]
    version: Option<Version>,
}

#[derive(Debug, Deserialize)]
struct Players {
    online: u32,
    #[serde(default)]
    max: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Version {
    name: String,
}

fn parse_status(payload: &[u8]) -> io::Result<StatusResponse> {
    let json = codec::read_string(payload)?;
    Ok(serde_json::from_slice(json)?)
}
