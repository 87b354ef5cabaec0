#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;
pub mod status_server_mock;

pub use builders::{dead_nameserver, ZoneBuilder};
pub use dns_server_mock::{MockDnsServer, ServerBehavior};
pub use status_server_mock::{Handshake, MockStatusServer, StatusReply};
