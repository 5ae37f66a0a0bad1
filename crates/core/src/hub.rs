//! Broadcast hub — fan-out of log entries and status snapshots to live
//! subscribers.
//!
//! The hub exclusively owns the replay buffer and the attached-subscriber
//! set. All mutation happens under one `std::sync::Mutex`, never across an
//! await point. That single critical section is what makes replay-then-live
//! delivery exactly-once: `attach` snapshots the buffer and registers the
//! subscriber atomically with respect to `publish`, so a subscriber sees
//! every entry once — no gap, no duplicate — across the replay/live
//! boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::log::{LogBuffer, LogEntry};
use crate::status::StatusSnapshot;

/// Opaque handle identifying one attached subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event pushed from the hub to a subscriber's transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A log entry, replayed or live.
    Log(LogEntry),

    /// A status snapshot. Never buffered, never replayed.
    BotStatus(StatusSnapshot),
}

/// Inbound frame from a live-transport client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Inject a command into the shared dispatch pipeline.
    Command { command: String },

    /// Request a status snapshot, delivered back to this subscriber only.
    GetStatus,
}

/// A live attachment: the subscriber's id plus the receiving end of its
/// delivery queue. Dropping the receiver is equivalent to a dead transport;
/// the hub detaches the subscriber on its next failed delivery.
pub struct Subscription {
    pub id: SubscriberId,
    pub rx: mpsc::UnboundedReceiver<ServerEvent>,
}

struct HubInner {
    buffer: LogBuffer,
    subscribers: HashMap<SubscriberId, mpsc::UnboundedSender<ServerEvent>>,
}

/// Fan-out hub for log entries and status snapshots.
///
/// Delivery is fire-and-forget over per-subscriber unbounded queues, so
/// `publish` never blocks the caller. A failed delivery (receiver dropped)
/// detaches that subscriber and is swallowed; the rest of the broadcast
/// continues.
pub struct BroadcastHub {
    inner: Mutex<HubInner>,
}

impl BroadcastHub {
    /// Create a hub whose replay buffer retains `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                buffer: LogBuffer::new(capacity),
                subscribers: HashMap::new(),
            }),
        }
    }

    /// Register a new subscriber.
    ///
    /// The buffered backlog (oldest first) is queued for the subscriber
    /// before it joins the live set, in the same critical section, so no
    /// concurrently published entry can be missed or seen twice.
    pub fn attach(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriberId::new();

        let mut inner = self.lock();
        for entry in inner.buffer.snapshot() {
            // The receiver end is still held here; these sends cannot fail.
            let _ = tx.send(ServerEvent::Log(entry));
        }
        inner.subscribers.insert(id, tx);

        Subscription { id, rx }
    }

    /// Remove a subscriber. Idempotent: unknown ids are a no-op.
    pub fn detach(&self, id: SubscriberId) {
        self.lock().subscribers.remove(&id);
    }

    /// Append `entry` to the replay buffer, then deliver it to every
    /// attached subscriber in the same relative order. Subscribers whose
    /// transport is gone are detached; the failure is not surfaced.
    pub fn publish(&self, entry: LogEntry) {
        let mut inner = self.lock();
        inner.buffer.append(entry.clone());
        inner
            .subscribers
            .retain(|_, tx| tx.send(ServerEvent::Log(entry.clone())).is_ok());
    }

    /// Deliver a status snapshot to every attached subscriber, bypassing
    /// the replay buffer.
    pub fn publish_status(&self, snapshot: StatusSnapshot) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|_, tx| tx.send(ServerEvent::BotStatus(snapshot.clone())).is_ok());
    }

    /// Deliver a status snapshot to one subscriber only. Unknown ids are a
    /// no-op; a dead transport is detached.
    pub fn send_status_to(&self, id: SubscriberId, snapshot: StatusSnapshot) {
        let mut inner = self.lock();
        let failed = match inner.subscribers.get(&id) {
            Some(tx) => tx.send(ServerEvent::BotStatus(snapshot)).is_err(),
            None => false,
        };
        if failed {
            inner.subscribers.remove(&id);
        }
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Drop every subscriber. Used at shutdown; there is nothing to flush.
    pub fn detach_all(&self) {
        self.lock().subscribers.clear();
    }

    /// Owned copy of the replay buffer, oldest first.
    pub fn buffer_snapshot(&self) -> Vec<LogEntry> {
        self.lock().buffer.snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(LogBuffer::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;

    fn entry(msg: &str) -> LogEntry {
        LogEntry::new(msg, Severity::Info)
    }

    fn drain_messages(sub: &mut Subscription) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(event) = sub.rx.try_recv() {
            match event {
                ServerEvent::Log(e) => out.push(e.message),
                ServerEvent::BotStatus(_) => out.push("<status>".into()),
            }
        }
        out
    }

    #[tokio::test]
    async fn attach_replays_buffer_then_live_entries() {
        let hub = BroadcastHub::new(3);
        // Publish A..D into a capacity-3 buffer: A is evicted.
        for msg in ["A", "B", "C", "D"] {
            hub.publish(entry(msg));
        }

        let mut sub = hub.attach();
        assert_eq!(drain_messages(&mut sub), vec!["B", "C", "D"]);

        // Nothing further until the next publish.
        assert!(sub.rx.try_recv().is_err());

        hub.publish(entry("E"));
        assert_eq!(drain_messages(&mut sub), vec!["E"]);

        let buffered: Vec<_> = hub
            .buffer_snapshot()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(buffered, vec!["C", "D", "E"]);
    }

    #[tokio::test]
    async fn subscribers_see_entries_in_the_same_order() {
        let hub = BroadcastHub::default();
        let mut s1 = hub.attach();
        hub.publish(entry("X"));
        let mut s2 = hub.attach();
        hub.publish(entry("Y"));

        // S1 saw X live, then Y. S2 saw X only via replay, then Y live.
        assert_eq!(drain_messages(&mut s1), vec!["X", "Y"]);
        assert_eq!(drain_messages(&mut s2), vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let hub = BroadcastHub::default();
        let sub = hub.attach();
        assert_eq!(hub.subscriber_count(), 1);

        hub.detach(sub.id);
        hub.detach(sub.id);
        assert_eq!(hub.subscriber_count(), 0);

        // Detaching an id that was never attached is also a no-op.
        let other = hub.attach();
        hub.detach(other.id);
        hub.detach(SubscriberId::new());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn dead_subscriber_is_reaped_without_disturbing_others() {
        let hub = BroadcastHub::default();
        let dead = hub.attach();
        let mut live = hub.attach();
        assert_eq!(hub.subscriber_count(), 2);

        drop(dead.rx);
        hub.publish(entry("after-drop"));

        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(drain_messages(&mut live), vec!["after-drop"]);
    }

    #[tokio::test]
    async fn status_bypasses_the_buffer() {
        let hub = BroadcastHub::default();
        let mut sub = hub.attach();

        hub.publish_status(StatusSnapshot::default());
        assert_eq!(drain_messages(&mut sub), vec!["<status>"]);
        assert!(hub.buffer_snapshot().is_empty());

        // A later subscriber gets no status replay.
        let mut late = hub.attach();
        assert!(late.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn targeted_status_reaches_only_its_subscriber() {
        let hub = BroadcastHub::default();
        let mut s1 = hub.attach();
        let mut s2 = hub.attach();

        hub.send_status_to(s1.id, StatusSnapshot::default());
        assert_eq!(drain_messages(&mut s1), vec!["<status>"]);
        assert!(s2.rx.try_recv().is_err());

        // Unknown target is a no-op.
        hub.send_status_to(SubscriberId::new(), StatusSnapshot::default());
        assert_eq!(hub.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn detach_all_clears_subscribers_and_closes_queues() {
        let hub = BroadcastHub::default();
        let mut sub = hub.attach();
        hub.detach_all();
        assert_eq!(hub.subscriber_count(), 0);
        // The queue closes once the sender is gone.
        assert!(sub.rx.recv().await.is_none());
    }

    #[test]
    fn server_event_wire_format() {
        let event = ServerEvent::Log(entry("hello"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"event":"log","data":{"#));

        let event = ServerEvent::BotStatus(StatusSnapshot::default());
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"event":"bot_status","data":{"#));
    }

    #[test]
    fn client_event_wire_format() {
        let frame = r#"{"event":"command","data":{"command":"status"}}"#;
        match serde_json::from_str::<ClientEvent>(frame).unwrap() {
            ClientEvent::Command { command } => assert_eq!(command, "status"),
            other => panic!("unexpected event: {other:?}"),
        }

        let frame = r#"{"event":"get_status"}"#;
        assert!(matches!(
            serde_json::from_str::<ClientEvent>(frame).unwrap(),
            ClientEvent::GetStatus
        ));

        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"unknown"}"#).is_err());
    }
}
