mod dns_lookup;
mod reachability_probe;
mod server_status;

pub use dns_lookup::DnsLookupPort;
pub use reachability_probe::ReachabilityProbe;
pub use server_status::ServerStatusPort;
