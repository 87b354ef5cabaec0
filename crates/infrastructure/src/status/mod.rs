//! Server status over the game's server list protocol.

mod codec;
pub mod client;

pub use client::StatusQueryClient;
