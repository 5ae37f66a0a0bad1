//! Console ingress adapter.
//!
//! Reads one command per line from stdin in a background task and forwards
//! each non-empty trimmed line to the command router. Reading resumes
//! immediately after dispatch; downstream side effects surface as log
//! entries, not as replies.

use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::warn;

use warden_core::command::{CommandRequest, CommandRouter, SourceChannel};

/// What to do with one line of console input.
#[derive(Debug, PartialEq, Eq)]
enum LineAction {
    /// Blank input, keep reading.
    Skip,
    /// The operator asked to end the session.
    Exit,
    /// Route the trimmed text as a command.
    Dispatch(String),
}

fn classify(line: &str) -> LineAction {
    let line = line.trim();
    if line.is_empty() {
        return LineAction::Skip;
    }
    if matches!(line, "exit" | "quit") {
        return LineAction::Exit;
    }
    LineAction::Dispatch(line.to_string())
}

/// Interactive console channel for operator commands.
pub struct ConsoleChannel {
    router: Arc<CommandRouter>,
}

impl ConsoleChannel {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self { router }
    }

    /// Spawn the reader task.
    ///
    /// Completion of the returned handle means the operator typed `exit`
    /// or stdin closed (Ctrl+D); the caller treats either as a shutdown
    /// request.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let stdin = io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match classify(&line) {
                        LineAction::Skip => continue,
                        LineAction::Exit => break,
                        LineAction::Dispatch(text) => {
                            self.router
                                .route(CommandRequest::new(text, SourceChannel::Console))
                                .await;
                        }
                    },
                    Ok(None) => break, // EOF (Ctrl+D)
                    Err(e) => {
                        warn!(error = %e, "Console input error");
                        break;
                    }
                }
            }
        })
    }
}
