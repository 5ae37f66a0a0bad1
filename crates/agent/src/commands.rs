//! Built-in command dispatcher.
//!
//! Interprets raw command text arriving from any ingress channel. All
//! outcomes — including unknown commands — are reported as log entries
//! through the fan-out logger, so every observer sees them. Nothing here
//! replies to the submitting channel directly.

use async_trait::async_trait;
use std::sync::Arc;

use warden_core::command::CommandDispatch;
use warden_core::logger::Logger;
use warden_core::status::AgentHandle;

/// The command table, shown by `help` and logged at startup.
pub const COMMANDS: &[(&str, &str)] = &[
    ("status", "Log the agent's current status"),
    ("connect", "Connect the agent to its configured server"),
    ("disconnect", "Disconnect the agent"),
    ("afk on|off", "Toggle AFK presence-keeping"),
    ("help", "List available commands"),
];

/// Dispatch collaborator that drives the presence agent.
pub struct CommandHandler {
    agent: Arc<dyn AgentHandle>,
    logger: Logger,
}

impl CommandHandler {
    pub fn new(agent: Arc<dyn AgentHandle>, logger: Logger) -> Self {
        Self { agent, logger }
    }

    /// Log the command table, one line per command.
    pub fn log_command_list(&self) {
        self.logger.info("Available commands:");
        for (name, description) in COMMANDS {
            self.logger.info(format!("  {name} - {description}"));
        }
    }

    fn log_status(&self) {
        match self.agent.status() {
            Ok(status) => {
                let server = status.server.as_deref().unwrap_or("none");
                let health = status
                    .health
                    .map_or_else(|| "unknown".into(), |h| format!("{h}"));
                let food = status
                    .food
                    .map_or_else(|| "unknown".into(), |f| format!("{f}"));
                self.logger.success(format!(
                    "Status: connected={}, server={}, afk={}, health={}, food={}",
                    status.connected, server, status.afk_active, health, food
                ));
            }
            Err(e) => self.logger.warning(format!("Status unavailable: {e}")),
        }
    }
}

#[async_trait]
impl CommandDispatch for CommandHandler {
    async fn handle_command(&self, raw: &str) {
        let mut parts = raw.split_whitespace();
        let Some(command) = parts.next() else {
            return;
        };

        match command {
            "status" => self.log_status(),
            "connect" => {
                if let Err(e) = self.agent.connect().await {
                    self.logger.error(format!("Connect failed: {e}"));
                }
            }
            "disconnect" => {
                if let Err(e) = self.agent.disconnect().await {
                    self.logger.error(format!("Disconnect failed: {e}"));
                }
            }
            "afk" => match parts.next() {
                Some("on") => {
                    if let Err(e) = self.agent.set_afk(true).await {
                        self.logger.warning(format!("Could not enable AFK mode: {e}"));
                    }
                }
                Some("off") => {
                    if let Err(e) = self.agent.set_afk(false).await {
                        self.logger.warning(format!("Could not disable AFK mode: {e}"));
                    }
                }
                _ => self.logger.warning("Usage: afk on|off"),
            },
            "help" => self.log_command_list(),
            other => self.logger.warning(format!("Unknown command: {other}")),
        }
    }
}
