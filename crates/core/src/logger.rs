//! Multi-sink activity logger.
//!
//! Every emitter in the process logs through one cloned [`Logger`] handle,
//! which delivers each entry to all registered sinks in registration order.
//! Sinks are registered once at startup; no call site knows or cares that a
//! broadcast pipeline exists behind the console output.
//!
//! The standard wiring is console sink first, hub sink second — the local
//! operator always sees an entry even if no dashboard is attached.

use std::sync::Arc;

use crate::hub::BroadcastHub;
use crate::log::{LogEntry, Severity};

/// Destination for activity log entries.
///
/// `record` must not panic and must not block; failures stay inside the
/// sink so one sink can never suppress delivery to another.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

/// Cheap-to-clone handle over the registered sink list.
#[derive(Clone)]
pub struct Logger {
    sinks: Arc<Vec<Arc<dyn LogSink>>>,
}

impl Logger {
    /// Build a logger from an ordered sink list.
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
        }
    }

    /// The standard fan-out: local console, then the broadcast hub.
    pub fn fanout(hub: Arc<BroadcastHub>) -> Self {
        Self::new(vec![Arc::new(ConsoleSink), Arc::new(HubSink::new(hub))])
    }

    /// Console-only logger, for offline tooling that has no hub.
    pub fn console_only() -> Self {
        Self::new(vec![Arc::new(ConsoleSink)])
    }

    /// Build one entry and deliver it to every sink in order.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        let entry = LogEntry::new(message, severity);
        for sink in self.sinks.iter() {
            sink.record(&entry);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(Severity::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }
}

/// Sink that writes entries to the local console via `tracing`.
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn record(&self, entry: &LogEntry) {
        match entry.severity {
            Severity::Info => tracing::info!("{}", entry.message),
            Severity::Success => tracing::info!(outcome = "success", "{}", entry.message),
            Severity::Warning => tracing::warn!("{}", entry.message),
            Severity::Error => tracing::error!("{}", entry.message),
        }
    }
}

/// Sink that publishes entries to the broadcast hub.
pub struct HubSink {
    hub: Arc<BroadcastHub>,
}

impl HubSink {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }
}

impl LogSink for HubSink {
    fn record(&self, entry: &LogEntry) {
        // Publish swallows per-subscriber failures internally.
        self.hub.publish(entry.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::ServerEvent;
    use std::sync::Mutex;

    struct RecordingSink {
        label: &'static str,
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl LogSink for RecordingSink {
        fn record(&self, entry: &LogEntry) {
            self.seen
                .lock()
                .unwrap()
                .push((self.label.into(), entry.message.clone()));
        }
    }

    #[test]
    fn every_call_reaches_every_sink_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(vec![
            Arc::new(RecordingSink {
                label: "first",
                seen: seen.clone(),
            }),
            Arc::new(RecordingSink {
                label: "second",
                seen: seen.clone(),
            }),
        ]);

        logger.info("one");
        logger.error("two");

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first".to_string(), "one".to_string()),
                ("second".to_string(), "one".to_string()),
                ("first".to_string(), "two".to_string()),
                ("second".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn severity_entry_points_stamp_the_right_severity() {
        struct SeveritySink(Arc<Mutex<Vec<Severity>>>);
        impl LogSink for SeveritySink {
            fn record(&self, entry: &LogEntry) {
                self.0.lock().unwrap().push(entry.severity);
            }
        }

        let severities = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(vec![Arc::new(SeveritySink(severities.clone()))]);
        logger.info("a");
        logger.success("b");
        logger.warning("c");
        logger.error("d");

        assert_eq!(
            *severities.lock().unwrap(),
            vec![
                Severity::Info,
                Severity::Success,
                Severity::Warning,
                Severity::Error
            ]
        );
    }

    #[tokio::test]
    async fn fanout_logger_feeds_the_hub() {
        let hub = Arc::new(BroadcastHub::default());
        let mut sub = hub.attach();

        let logger = Logger::fanout(hub.clone());
        logger.success("connected");

        match sub.rx.try_recv().unwrap() {
            ServerEvent::Log(entry) => {
                assert_eq!(entry.message, "connected");
                assert_eq!(entry.severity, Severity::Success);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // And the entry is buffered for future replay.
        assert_eq!(hub.buffer_snapshot().len(), 1);
    }
}
