pub mod resolve;

pub use resolve::{ResolutionHandle, ResolutionReport, ResolveServerUseCase, ServerAddressResolver};
