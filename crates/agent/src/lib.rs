//! Agent-side collaborators for the AFKWarden control plane.
//!
//! Two implementations of the core collaborator traits live here:
//! - [`PresenceAgent`] — the agent facade the control plane connects,
//!   disconnects, and reads status from
//! - [`CommandHandler`] — the dispatch collaborator that interprets raw
//!   command text arriving through the router

pub mod commands;
pub mod presence;

pub use commands::{CommandHandler, COMMANDS};
pub use presence::PresenceAgent;
