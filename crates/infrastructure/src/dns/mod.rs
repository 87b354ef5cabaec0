pub mod forwarding;
pub mod load_balancer;
pub mod lookup;
pub mod transport;

pub use load_balancer::FailoverStrategy;
pub use lookup::{HostLookupStrategy, UpstreamDnsLookup};
