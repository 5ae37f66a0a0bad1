//! Live-transport endpoint.
//!
//! Each dashboard connection attaches to the broadcast hub, receives the
//! buffered backlog, then live entries as they are published. Inbound
//! frames carry commands and status requests; malformed frames are
//! ignored. Disconnection detaches the subscriber.

use axum::{
    extract::State,
    extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::debug;

use crate::SharedState;
use warden_core::command::{CommandRequest, SourceChannel};
use warden_core::hub::{ClientEvent, SubscriberId, Subscription};

/// `GET /ws` — live-transport upgrade for dashboard clients.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: SharedState) {
    // Attach before anything else: replay is queued atomically with
    // registration, so no published entry can slip between the two.
    let Subscription { id, mut rx } = state.hub.attach();
    state.logger.info("Dashboard client connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                // None means the hub dropped us (shutdown teardown).
                let Some(event) = event else { break };
                let frame = match serde_json::to_string(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        debug!(error = %e, "Skipping unserializable event");
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_client_frame(&text, id, &state).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ignore binary, ping, pong
                    Some(Err(_)) => break,
                }
            }
        }
    }

    state.hub.detach(id);
    state.logger.info("Dashboard client disconnected");
}

async fn handle_client_frame(text: &str, id: SubscriberId, state: &SharedState) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            // Ingress errors are dropped, never surfaced to the client.
            debug!(error = %e, "Ignoring malformed client frame");
            return;
        }
    };

    match event {
        ClientEvent::Command { command } => {
            state
                .logger
                .info(format!("Dashboard command received: {command}"));
            state
                .router
                .route(CommandRequest::new(command, SourceChannel::Live))
                .await;
        }
        ClientEvent::GetStatus => {
            let snapshot = state.aggregator.compute_snapshot();
            state.hub.send_status_to(id, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use warden_core::hub::ServerEvent;
    use warden_core::log::Severity;

    #[tokio::test]
    async fn command_frames_are_logged_and_routed() {
        let (state, dispatch) = test_support::state_with(Ok(test_support::connected_status()));
        let sub = state.hub.attach();

        handle_client_frame(
            r#"{"event":"command","data":{"command":"afk on"}}"#,
            sub.id,
            &state,
        )
        .await;

        assert_eq!(*dispatch.0.lock().unwrap(), vec!["afk on"]);

        // The receipt log entry went through the fan-out into the buffer.
        let buffered = state.hub.buffer_snapshot();
        assert!(
            buffered
                .iter()
                .any(|e| e.message.contains("Dashboard command received: afk on")
                    && e.severity == Severity::Info)
        );
    }

    #[tokio::test]
    async fn get_status_replies_to_that_subscriber_only() {
        let (state, _) = test_support::state_with(Ok(test_support::connected_status()));
        let mut asking = state.hub.attach();
        let mut bystander = state.hub.attach();

        handle_client_frame(r#"{"event":"get_status"}"#, asking.id, &state).await;

        match asking.rx.try_recv().unwrap() {
            ServerEvent::BotStatus(snapshot) => {
                assert!(snapshot.connected);
                assert_eq!(snapshot.username.as_deref(), Some("Warden"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(bystander.rx.try_recv().is_err());

        // Status never lands in the replay buffer.
        assert!(state.hub.buffer_snapshot().is_empty());
    }

    #[tokio::test]
    async fn malformed_frames_are_ignored() {
        let (state, dispatch) = test_support::state_with(Ok(test_support::connected_status()));
        let sub = state.hub.attach();

        for frame in ["not json", "{}", r#"{"event":"teleport"}"#] {
            handle_client_frame(frame, sub.id, &state).await;
        }

        assert!(dispatch.0.lock().unwrap().is_empty());
        assert_eq!(state.hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn blank_command_frames_never_reach_dispatch() {
        let (state, dispatch) = test_support::state_with(Ok(test_support::connected_status()));
        let sub = state.hub.attach();

        handle_client_frame(
            r#"{"event":"command","data":{"command":"   "}}"#,
            sub.id,
            &state,
        )
        .await;

        assert!(dispatch.0.lock().unwrap().is_empty());
    }
}
