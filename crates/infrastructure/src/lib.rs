//! Minecraft server address resolver - infrastructure layer
pub mod dns;
pub mod probe;
pub mod status;
pub mod system;
