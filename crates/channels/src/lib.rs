//! Ingress channel adapters for AFKWarden.
//!
//! Adapters translate channel-specific input into calls on the command
//! router. They hold references to the router (and, for outbound-capable
//! channels, the broadcast hub) but never touch buffer internals.
//!
//! Available adapters:
//! - **Console** — line-oriented stdin prompt
//!
//! The HTTP status page and the live-transport endpoint are hosted by the
//! gateway crate, which owns the server they hang off.

pub mod console;

pub use console::ConsoleChannel;
