//! Command ingestion: request shaping and the single dispatch path.
//!
//! Commands arrive from heterogeneous ingress channels (console, live
//! dashboard) and merge into one serialized path through the
//! [`CommandRouter`]. Once routed, the source channel no longer matters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Which ingress channel a command arrived on.
///
/// Kept for logging and diagnostics only; routing never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceChannel {
    Console,
    Http,
    Live,
}

impl std::fmt::Display for SourceChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceChannel::Console => "console",
            SourceChannel::Http => "http",
            SourceChannel::Live => "live",
        };
        write!(f, "{s}")
    }
}

/// One inbound command. Created per submission, consumed by the router
/// immediately, discarded after dispatch.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// The raw command text, untouched.
    pub raw: String,

    /// Where the command came from.
    pub source: SourceChannel,
}

impl CommandRequest {
    pub fn new(raw: impl Into<String>, source: SourceChannel) -> Self {
        Self {
            raw: raw.into(),
            source,
        }
    }
}

/// The external collaborator that interprets and executes command text.
///
/// Fire-and-forget from the router's perspective: the dispatcher reports
/// outcomes through its own log calls, which re-enter the fan-out pipeline.
#[async_trait]
pub trait CommandDispatch: Send + Sync {
    async fn handle_command(&self, raw: &str);
}

/// Forwards raw command text from any ingress channel to the single
/// dispatch collaborator.
///
/// Empty or whitespace-only text is dropped silently. The router does not
/// interpret, validate, or rate-limit command text, and does not wait for
/// or correlate the log entries the dispatcher may emit.
pub struct CommandRouter {
    dispatch: Arc<dyn CommandDispatch>,
}

impl CommandRouter {
    pub fn new(dispatch: Arc<dyn CommandDispatch>) -> Self {
        Self { dispatch }
    }

    pub async fn route(&self, request: CommandRequest) {
        if request.raw.trim().is_empty() {
            debug!(source = %request.source, "Dropping blank command");
            return;
        }

        debug!(source = %request.source, command = %request.raw, "Routing command");
        self.dispatch.handle_command(&request.raw).await;
    }
}
