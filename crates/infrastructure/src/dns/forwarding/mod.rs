pub mod query;
pub mod response_parser;

pub use query::DnsQuery;
pub use response_parser::{DnsResponse, ResponseParser};
