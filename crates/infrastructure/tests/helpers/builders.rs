#![allow(dead_code)]
use super::dns_server_mock::ZoneEntry;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{A, AAAA, CNAME, SRV};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

const TTL: u32 = 300;

fn fqdn(name: &str) -> Name {
    let mut name = Name::from_str(name).unwrap();
    name.set_fqdn(true);
    name
}

/// Fluent builder for the records a [`super::MockDnsServer`] serves.
#[derive(Default)]
pub struct ZoneBuilder {
    entries: HashMap<(String, RecordType), ZoneEntry>,
}

impl ZoneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &str, record_type: RecordType, rdata: RData) -> Self {
        let record = Record::from_rdata(fqdn(name), TTL, rdata);
        let key = (name.trim_end_matches('.').to_lowercase(), record_type);
        match self.entries.entry(key).or_insert_with(|| ZoneEntry::Answers(Vec::new())) {
            ZoneEntry::Answers(records) => records.push(record),
            entry => *entry = ZoneEntry::Answers(vec![record]),
        }
        self
    }

    pub fn a(self, name: &str, ip: Ipv4Addr) -> Self {
        self.push(name, RecordType::A, RData::A(A(ip)))
    }

    pub fn aaaa(self, name: &str, ip: Ipv6Addr) -> Self {
        self.push(name, RecordType::AAAA, RData::AAAA(AAAA(ip)))
    }

    pub fn srv(self, name: &str, priority: u16, weight: u16, port: u16, target: &str) -> Self {
        self.push(
            name,
            RecordType::SRV,
            RData::SRV(SRV::new(priority, weight, port, fqdn(target))),
        )
    }

    /// CNAME answered for A and AAAA queries, without the target's addresses
    pub fn cname(self, name: &str, target: &str) -> Self {
        self.push(name, RecordType::A, RData::CNAME(CNAME(fqdn(target))))
            .push(name, RecordType::AAAA, RData::CNAME(CNAME(fqdn(target))))
    }

    /// Answers with no records (NOERROR / NODATA)
    pub fn empty(mut self, name: &str, record_type: RecordType) -> Self {
        self.entries.insert(
            (name.to_lowercase(), record_type),
            ZoneEntry::Answers(Vec::new()),
        );
        self
    }

    pub fn rcode(mut self, name: &str, record_type: RecordType, rcode: ResponseCode) -> Self {
        self.entries
            .insert((name.to_lowercase(), record_type), ZoneEntry::Rcode(rcode));
        self
    }

    pub fn build(self) -> HashMap<(String, RecordType), ZoneEntry> {
        self.entries
    }
}

/// An address nothing listens on: bound, read, and dropped.
pub async fn dead_nameserver() -> SocketAddr {
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap()
}
