mod resolve_server;
mod server_address_resolver;

pub use resolve_server::{ResolutionReport, ResolveServerUseCase};
pub use server_address_resolver::{ResolutionHandle, ServerAddressResolver};
