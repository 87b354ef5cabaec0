pub mod failover;
pub mod query;

pub use failover::{FailoverStrategy, UpstreamResult};
pub use query::{query_server, QueryAttemptResult};
