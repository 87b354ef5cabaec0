//! Outgoing DNS queries in wire format, built with `hickory-proto`.

use super::DnsResponse;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as WireType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use mc_resolver_domain::{DomainError, RecordType};
use std::str::FromStr;

/// A single-question recursive query with a random transaction ID.
///
/// The same bytes are reused for the TCP retry after a truncated UDP answer,
/// so both attempts are matched against one ID.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    id: u16,
    name: Name,
    record_type: RecordType,
    bytes: Vec<u8>,
}

impl DnsQuery {
    pub fn new(name: &str, record_type: RecordType) -> Result<Self, DomainError> {
        Self::with_id(fastrand::u16(..), name, record_type)
    }

    pub fn with_id(id: u16, name: &str, record_type: RecordType) -> Result<Self, DomainError> {
        let mut name = Name::from_str(name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e))
        })?;
        name.set_fqdn(true);

        let mut question = Query::query(name.clone(), wire_type(record_type));
        question.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question);

        Ok(Self {
            id,
            name,
            record_type,
            bytes: encode(&message)?,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Rejects answers to some other query: a stale datagram or a spoofed reply.
    pub fn check_response(&self, response: &DnsResponse) -> Result<(), DomainError> {
        if response.id != self.id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {} for {} {}",
                response.id, self.id, self.record_type, self.name
            )));
        }
        Ok(())
    }
}

fn wire_type(record_type: RecordType) -> WireType {
    match record_type {
        RecordType::A => WireType::A,
        RecordType::AAAA => WireType::AAAA,
        RecordType::SRV => WireType::SRV,
    }
}

pub(crate) fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
    })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srv_query_header() {
        let query = DnsQuery::new("_minecraft._tcp.example.com", RecordType::SRV).unwrap();
        let bytes = query.as_bytes();

        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), query.id());
        assert_eq!(bytes[2] & 0x01, 0x01, "RD flag");
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1, "QDCOUNT");
    }

    #[test]
    fn test_question_section() {
        let query = DnsQuery::with_id(7, "mc.example.com", RecordType::AAAA).unwrap();
        let message = Message::from_vec(query.as_bytes()).unwrap();
        let question = &message.queries()[0];

        assert_eq!(message.id(), 7);
        assert_eq!(question.query_type(), WireType::AAAA);
        assert_eq!(question.name().to_ascii(), "mc.example.com.");
    }

    #[test]
    fn test_each_record_type_is_encoded() {
        for (record_type, expected) in [
            (RecordType::A, WireType::A),
            (RecordType::AAAA, WireType::AAAA),
            (RecordType::SRV, WireType::SRV),
        ] {
            let query = DnsQuery::new("example.com", record_type).unwrap();
            let message = Message::from_vec(query.as_bytes()).unwrap();
            assert_eq!(message.queries()[0].query_type(), expected);
        }
    }

    #[test]
    fn test_label_too_long() {
        let result = DnsQuery::new(&"a".repeat(64), RecordType::A);
        assert!(matches!(result, Err(DomainError::InvalidDomainName(_))));
    }
}
