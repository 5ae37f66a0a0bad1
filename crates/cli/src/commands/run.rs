//! `afkwarden run` — start the full control plane.
//!
//! Wiring order: replay buffer and hub first, then the fan-out logger,
//! then the collaborators, then the ingress adapters. Teardown detaches
//! every subscriber and disconnects the agent; there is nothing to flush.

use anyhow::Context;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use warden_agent::{CommandHandler, PresenceAgent};
use warden_channels::ConsoleChannel;
use warden_config::AppConfig;
use warden_core::command::CommandRouter;
use warden_core::hub::BroadcastHub;
use warden_core::logger::Logger;
use warden_core::status::{AgentHandle, StatusAggregator};
use warden_gateway::{GatewayState, SharedState};

pub async fn run(port_override: Option<u16>, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::load_from(&path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let hub = Arc::new(BroadcastHub::new(config.log.buffer_capacity));
    let logger = Logger::fanout(hub.clone());

    let agent = Arc::new(PresenceAgent::new(&config.agent, logger.clone()));
    let dispatch = Arc::new(CommandHandler::new(agent.clone(), logger.clone()));
    let router = Arc::new(CommandRouter::new(dispatch.clone()));
    let aggregator = Arc::new(StatusAggregator::new(agent.clone()));

    logger.info("=== AFKWarden ===");
    dispatch.log_command_list();

    // Auto-connect on startup. A failed connect is reported, not fatal;
    // the operator can retry with the `connect` command.
    if let Err(e) = agent.connect().await {
        logger.error(format!("Initial connect failed: {e}"));
    }

    let console = ConsoleChannel::new(router.clone()).spawn();

    let state: SharedState = Arc::new(GatewayState {
        hub: hub.clone(),
        router,
        aggregator,
        logger: logger.clone(),
        config,
        started_at: Utc::now(),
    });
    let gateway = tokio::spawn(async move {
        if let Err(e) = warden_gateway::start(state).await {
            error!(error = %e, "Gateway terminated");
        }
    });

    // Run until the operator exits the console or a shutdown signal lands.
    tokio::select! {
        _ = console => {
            logger.info("Exiting AFKWarden...");
        }
        _ = tokio::signal::ctrl_c() => {
            logger.info("Received shutdown signal. Disconnecting...");
        }
    }

    if let Err(e) = agent.disconnect().await {
        logger.warning(format!("Disconnect failed: {e}"));
    }
    hub.detach_all();
    gateway.abort();

    Ok(())
}
