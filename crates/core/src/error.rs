//! Error types for the AFKWarden domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all AFKWarden operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Agent collaborator errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Ingress channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Agent is not connected")]
    NotConnected,

    #[error("Agent has not been initialized yet")]
    NotInitialized,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_displays_correctly() {
        let err = Error::Agent(AgentError::ConnectionFailed("host unreachable".into()));
        assert!(err.to_string().contains("host unreachable"));
    }

    #[test]
    fn channel_error_displays_correctly() {
        let err = Error::Channel(ChannelError::BindFailed {
            addr: "0.0.0.0:8080".into(),
            reason: "address in use".into(),
        });
        assert!(err.to_string().contains("0.0.0.0:8080"));
        assert!(err.to_string().contains("address in use"));
    }
}
