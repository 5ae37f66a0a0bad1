//! `afkwarden command` — offline dispatch preview.
//!
//! Runs a single command through the router and a print-only dispatcher,
//! so operators can check what would be dispatched without a live agent
//! session. With no text, lists the command table.

use async_trait::async_trait;
use std::sync::Arc;

use warden_agent::COMMANDS;
use warden_core::command::{CommandDispatch, CommandRequest, CommandRouter, SourceChannel};
use warden_core::logger::Logger;

struct PreviewDispatch {
    logger: Logger,
}

#[async_trait]
impl CommandDispatch for PreviewDispatch {
    async fn handle_command(&self, raw: &str) {
        self.logger.info(format!("Would dispatch: {raw}"));
        self.logger
            .info("Run this inside an active session to execute it");
    }
}

pub async fn run(text: String) -> anyhow::Result<()> {
    let logger = Logger::console_only();

    if text.trim().is_empty() {
        logger.info("Available commands:");
        for (name, description) in COMMANDS {
            logger.info(format!("  {name} - {description}"));
        }
        return Ok(());
    }

    let router = CommandRouter::new(Arc::new(PreviewDispatch {
        logger: logger.clone(),
    }));
    router
        .route(CommandRequest::new(text, SourceChannel::Console))
        .await;

    Ok(())
}
