//! DNS over TCP (RFC 1035 §4.2.2)
//!
//! Each message is preceded by a two-byte big-endian length. Used directly
//! for `tcp://` nameservers and as the retry path after a truncated UDP answer.

use super::{io_step, DnsTransport, TransportResponse};
use async_trait::async_trait;
use mc_resolver_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn exchange(
        &self,
        query: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let mut stream = io_step(server, timeout, "connect to", TcpStream::connect(server)).await?;
        stream
            .set_nodelay(true)
            .map_err(|e| DomainError::TransportError(format!("TCP_NODELAY on {}: {}", server, e)))?;

        io_step(server, timeout, "write to", write_framed(&mut stream, query)).await?;
        let bytes = io_step(server, timeout, "read from", read_framed(&mut stream)).await?;

        debug!(server = %server, sent = query.len(), received = bytes.len(), "TCP exchange complete");

        Ok(TransportResponse {
            bytes,
            protocol: "TCP",
        })
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

pub(crate) async fn write_framed<S>(stream: &mut S, message: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let length = u16::try_from(message.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DNS message of {} bytes exceeds TCP framing", message.len()),
        )
    })?;

    let mut framed = Vec::with_capacity(message.len() + 2);
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message);
    stream.write_all(&framed).await?;
    stream.flush().await
}

pub(crate) async fn read_framed<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let mut message = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut message).await?;
    Ok(message)
}
