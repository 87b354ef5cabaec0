pub mod host_lookup;
pub mod resolv_conf;

pub use resolv_conf::{fallback_nameservers, ResolvConfReader};
