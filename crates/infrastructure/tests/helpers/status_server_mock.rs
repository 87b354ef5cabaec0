#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// How the server answers a status request.
#[derive(Clone)]
pub enum StatusReply {
    /// A status response (packet 0x00) carrying this JSON
    Json(String),
    /// A well-formed packet with another ID
    PacketId(i32),
    /// Reads the request and never answers
    Silent,
}

/// Fields decoded from the client's handshake packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub host: String,
    pub port: u16,
    pub next_state: i32,
}

/// Game server on 127.0.0.1 that speaks just enough of the server list
/// protocol to answer one status request per connection.
pub struct MockStatusServer {
    addr: SocketAddr,
    handshakes: Arc<Mutex<Vec<Handshake>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockStatusServer {
    pub async fn start(reply: StatusReply) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handshakes = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let seen = Arc::clone(&handshakes);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let seen = Arc::clone(&seen);
                        let reply = reply.clone();
                        tokio::spawn(async move {
                            let Some(handshake) = read_handshake(&mut stream).await else { return };
                            seen.lock().unwrap().push(handshake);

                            // status request: length 1, id 0x00
                            let mut request = [0u8; 2];
                            if stream.read_exact(&mut request).await.is_err() || request != [0x01, 0x00] {
                                return;
                            }

                            let packet = match reply {
                                StatusReply::Json(json) => {
                                    let mut body = varint(0x00);
                                    body.extend(varint(json.len() as i32));
                                    body.extend_from_slice(json.as_bytes());
                                    body
                                }
                                StatusReply::PacketId(id) => {
                                    let mut body = varint(id);
                                    body.extend(varint(2));
                                    body.extend_from_slice(b"{}");
                                    body
                                }
                                StatusReply::Silent => {
                                    let _ = stream.read_u8().await;
                                    return;
                                }
                            };
                            let mut framed = varint(packet.len() as i32);
                            framed.extend(packet);
                            let _ = stream.write_all(&framed).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            handshakes,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn handshakes(&self) -> Vec<Handshake> {
        self.handshakes.lock().unwrap().clone()
    }
}

impl Drop for MockStatusServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn varint(value: i32) -> Vec<u8> {
    let mut value = value as u32;
    let mut out = Vec::new();
    loop {
        if value < 0x80 {
            out.push(value as u8);
            return out;
        }
        out.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
}

async fn read_varint<S: AsyncRead + Unpin>(stream: &mut S) -> Option<i32> {
    let mut value = 0u32;
    for shift in (0..35).step_by(7) {
        let byte = stream.read_u8().await.ok()?;
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Some(value as i32);
        }
    }
    None
}

async fn read_handshake<S: AsyncRead + Unpin>(stream: &mut S) -> Option<Handshake> {
    let _length = read_varint(stream).await?;
    let id = read_varint(stream).await?;
    if id != 0x00 {
        return None;
    }
    let protocol_version = read_varint(stream).await?;
    let host_len = read_varint(stream).await? as usize;
    let mut host = vec![0u8; host_len];
    stream.read_exact(&mut host).await.ok()?;
    let port = stream.read_u16().await.ok()?;
    let next_state = read_varint(stream).await?;

    Some(Handshake {
        protocol_version,
        host: String::from_utf8(host).ok()?,
        port,
        next_state,
    })
}
