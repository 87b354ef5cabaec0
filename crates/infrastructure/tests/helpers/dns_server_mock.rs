#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// What the server answers for one (name, type) pair.
#[derive(Clone)]
pub enum ZoneEntry {
    Answers(Vec<Record>),
    Rcode(ResponseCode),
}

#[derive(Clone, Copy, Default)]
pub struct ServerBehavior {
    /// UDP answers carry the TC bit and no records; TCP answers are complete
    pub truncate_udp: bool,
    /// Responses carry an ID different from the query's
    pub wrong_id: bool,
    /// Queries are read but never answered
    pub silent: bool,
}

type Zone = HashMap<(String, RecordType), ZoneEntry>;

/// Authoritative-style DNS server on 127.0.0.1 listening on UDP and TCP
/// with the same port. Unknown names answer NXDOMAIN.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(zone: Zone) -> Result<Self, std::io::Error> {
        Self::start_with(zone, ServerBehavior::default()).await
    }

    pub async fn start_with(zone: Zone, behavior: ServerBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let zone = Arc::new(zone);
        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if behavior.silent {
                                continue;
                            }
                            if let Some(response) = build_response(&zone, &buf[..len], behavior, true) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            let zone = Arc::clone(&zone);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() || behavior.silent {
                                    return;
                                }
                                if let Some(response) = build_response(&zone, &query, behavior, false) {
                                    let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                                    framed.extend_from_slice(&response);
                                    let _ = stream.write_all(&framed).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(zone: &Zone, query: &[u8], behavior: ServerBehavior, udp: bool) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let question = request.queries().first()?.clone();

    let name = question.name().to_ascii().trim_end_matches('.').to_lowercase();
    let id = if behavior.wrong_id {
        request.id().wrapping_add(1)
    } else {
        request.id()
    };

    let mut response = Message::new(id, MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    response.add_query(question.clone());

    if udp && behavior.truncate_udp {
        response.set_truncated(true);
    } else {
        match zone.get(&(name, question.query_type())) {
            Some(ZoneEntry::Answers(records)) => {
                for record in records {
                    response.add_answer(record.clone());
                }
            }
            Some(ZoneEntry::Rcode(rcode)) => {
                response.set_response_code(*rcode);
            }
            None => {
                response.set_response_code(ResponseCode::NXDomain);
            }
        }
    }

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    response.emit(&mut encoder).ok()?;
    Some(buf)
}
