//! Presence agent facade.
//!
//! Tracks the connection and AFK state the control plane observes, and
//! emits the log lines for every transition through the shared fan-out
//! logger. The actual remote-protocol session is owned by the embedding
//! application; it reports vitals back through [`PresenceAgent::update_vitals`].

use async_trait::async_trait;
use std::sync::Mutex;

use warden_config::AgentConfig;
use warden_core::error::AgentError;
use warden_core::logger::Logger;
use warden_core::status::{AgentHandle, AgentStatus};

#[derive(Debug, Default)]
struct PresenceState {
    initialized: bool,
    connected: bool,
    afk_active: bool,
    health: Option<f32>,
    food: Option<u32>,
}

/// The agent collaborator: a presence session on a remote server.
pub struct PresenceAgent {
    username: String,
    server: String,
    logger: Logger,
    state: Mutex<PresenceState>,
}

impl PresenceAgent {
    pub fn new(config: &AgentConfig, logger: Logger) -> Self {
        Self {
            username: config.username.clone(),
            server: config.server.clone(),
            logger,
            state: Mutex::new(PresenceState::default()),
        }
    }

    /// Record vitals reported by the remote session.
    pub fn update_vitals(&self, health: f32, food: u32) {
        let mut state = self.lock();
        state.health = Some(health);
        state.food = Some(food);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PresenceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AgentHandle for PresenceAgent {
    async fn connect(&self) -> Result<(), AgentError> {
        {
            let mut state = self.lock();
            state.initialized = true;
            if state.connected {
                drop(state);
                self.logger
                    .warning(format!("Already connected to {}", self.server));
                return Ok(());
            }
        }

        self.logger.info(format!(
            "Connecting to {} as {}...",
            self.server, self.username
        ));

        self.lock().connected = true;
        self.logger
            .success(format!("Connected to {}", self.server));
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), AgentError> {
        {
            let mut state = self.lock();
            if !state.connected {
                return Ok(());
            }
            state.connected = false;
            state.afk_active = false;
            state.health = None;
            state.food = None;
        }

        self.logger
            .info(format!("Disconnected from {}", self.server));
        Ok(())
    }

    async fn set_afk(&self, active: bool) -> Result<(), AgentError> {
        {
            let mut state = self.lock();
            if !state.connected {
                return Err(AgentError::NotConnected);
            }
            state.afk_active = active;
        }

        if active {
            self.logger.success("AFK mode activated");
        } else {
            self.logger.info("AFK mode deactivated");
        }
        Ok(())
    }

    fn status(&self) -> Result<AgentStatus, AgentError> {
        let state = self.lock();
        if !state.initialized {
            return Err(AgentError::NotInitialized);
        }

        Ok(AgentStatus {
            connected: state.connected,
            server: state.connected.then(|| self.server.clone()),
            afk_active: state.afk_active,
            username: Some(self.username.clone()),
            health: state.health,
            food: state.food,
        })
    }
}
