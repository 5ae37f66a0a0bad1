//! Agent status: the collaborator interface and the snapshot aggregator.
//!
//! The control plane never reaches into the agent's internals. It asks the
//! [`AgentHandle`] collaborator for a point-in-time [`AgentStatus`] and
//! shapes it into the transport-neutral [`StatusSnapshot`] served to
//! observers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::error::AgentError;

/// Live state reported by the agent collaborator. Fields may be partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentStatus {
    pub connected: bool,
    pub server: Option<String>,
    pub afk_active: bool,
    pub username: Option<String>,
    pub health: Option<f32>,
    pub food: Option<u32>,
}

/// The agent collaborator consumed by the control plane.
///
/// Implementations maintain presence on a remote service. The control plane
/// only connects, disconnects, toggles AFK mode, and reads status.
#[async_trait]
pub trait AgentHandle: Send + Sync {
    /// Establish the agent's session.
    async fn connect(&self) -> std::result::Result<(), AgentError>;

    /// Tear the agent's session down. Safe to call when not connected.
    async fn disconnect(&self) -> std::result::Result<(), AgentError>;

    /// Toggle AFK presence-keeping.
    async fn set_afk(&self, active: bool) -> std::result::Result<(), AgentError>;

    /// Point-in-time state. May fail before the agent is initialized.
    fn status(&self) -> std::result::Result<AgentStatus, AgentError>;
}

/// Transport-neutral status record served to observers.
///
/// Computed fresh on every request; never cached, never buffered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub connected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    pub afk_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<u32>,
}

/// Shapes the agent collaborator's live state into a [`StatusSnapshot`].
///
/// A collaborator failure degrades to `connected: false` with all optional
/// fields absent. Status reporting never takes down the control plane.
pub struct StatusAggregator {
    agent: Arc<dyn AgentHandle>,
}

impl StatusAggregator {
    pub fn new(agent: Arc<dyn AgentHandle>) -> Self {
        Self { agent }
    }

    /// Query the agent and shape the result for transport.
    pub fn compute_snapshot(&self) -> StatusSnapshot {
        match self.agent.status() {
            Ok(status) => StatusSnapshot {
                connected: status.connected,
                server: status.server,
                afk_active: status.afk_active,
                username: status.username,
                health: status.health,
                food: status.food,
            },
            Err(e) => {
                warn!(error = %e, "Agent status unavailable, reporting disconnected");
                StatusSnapshot::default()
            }
        }
    }
}
