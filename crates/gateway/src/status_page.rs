//! Read-only HTML status page.
//!
//! Rebuilt fresh on every request from a live status snapshot; the log
//! buffer is not involved. Accepts no commands.

use axum::{extract::State, response::Html};
use chrono::{DateTime, Utc};

use crate::SharedState;
use warden_core::status::StatusSnapshot;

pub async fn status_page_handler(State(state): State<SharedState>) -> Html<String> {
    let snapshot = state.aggregator.compute_snapshot();
    let username = snapshot
        .username
        .clone()
        .unwrap_or_else(|| state.config.agent.username.clone());
    Html(render(&snapshot, &username, state.started_at))
}

fn render(snapshot: &StatusSnapshot, username: &str, started_at: DateTime<Utc>) -> String {
    let (status_label, status_class, connection_line) = if snapshot.connected {
        (
            "ONLINE",
            "online",
            format!(
                "Connected to {}",
                snapshot.server.as_deref().unwrap_or("unknown server")
            ),
        )
    } else {
        (
            "CONNECTING",
            "connecting",
            "Attempting to connect...".to_string(),
        )
    };

    let afk_line = if snapshot.afk_active {
        "Active"
    } else {
        "Inactive"
    };
    let server = snapshot.server.as_deref().unwrap_or("Not connected");
    let now = Utc::now().to_rfc3339();
    let started = started_at.to_rfc3339();
    let version = env!("CARGO_PKG_VERSION");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>AFKWarden Status</title>
  <meta http-equiv="refresh" content="30">
  <style>
    body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
    h1 {{ color: #333; }}
    .status {{ padding: 15px; border-radius: 5px; margin: 20px 0; }}
    .online {{ background-color: #d4edda; color: #155724; }}
    .connecting {{ background-color: #fff3cd; color: #856404; }}
    .info {{ background-color: #f8f9fa; border: 1px solid #ddd; padding: 15px; border-radius: 5px; }}
    .footer {{ margin-top: 30px; font-size: 0.8em; color: #6c757d; }}
    .features {{ margin-top: 20px; }}
    .features ul {{ padding-left: 20px; }}
  </style>
</head>
<body>
  <h1>AFKWarden Status Monitor</h1>

  <div class="status {status_class}">
    <h2>Agent is {status_label}</h2>
    <p>Last checked: {now}</p>
    <p>Connection: {connection_line}</p>
    <p>AFK Mode: {afk_line}</p>
  </div>

  <div class="info">
    <h3>Agent Information:</h3>
    <p><strong>Server:</strong> {server}</p>
    <p><strong>Username:</strong> {username}</p>
    <p><strong>Version:</strong> {version}</p>
  </div>

  <div class="features">
    <h3>Features:</h3>
    <ul>
      <li>Automatic presence keep-alive while AFK</li>
      <li>Auto-reconnect if disconnected</li>
      <li>Live dashboard log stream with replay</li>
      <li>Commands from console and dashboard</li>
      <li>On-demand status snapshots</li>
    </ul>
  </div>

  <div class="footer">
    <p>This status page automatically refreshes every 30 seconds.</p>
    <p>Server start: {started}</p>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use crate::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use warden_core::error::AgentError;

    async fn page_for(
        status: Result<warden_core::status::AgentStatus, AgentError>,
    ) -> (StatusCode, String) {
        let (state, _) = test_support::state_with(status);
        let app = build_router(state);

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let code = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (code, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn connected_agent_renders_online_page() {
        let (code, body) = page_for(Ok(test_support::connected_status())).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body.contains("<!DOCTYPE html>"));
        assert!(body.contains("Agent is ONLINE"));
        assert!(body.contains("Connected to play.example.net:25565"));
        assert!(body.contains("AFK Mode: Active"));
        assert!(body.contains("Warden"));
        assert!(body.contains(env!("CARGO_PKG_VERSION")));
        assert!(body.contains("refreshes every 30 seconds"));
        assert!(body.contains("Server start:"));
    }

    #[tokio::test]
    async fn failing_agent_still_renders_a_page() {
        let (code, body) = page_for(Err(AgentError::NotInitialized)).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body.contains("Agent is CONNECTING"));
        assert!(body.contains("Attempting to connect..."));
        assert!(body.contains("AFK Mode: Inactive"));
        // Falls back to the configured username.
        assert!(body.contains("AFKWarden"));
    }

    #[test]
    fn render_is_rebuilt_per_call() {
        let snapshot = StatusSnapshot::default();
        let started = Utc::now();
        let a = render(&snapshot, "Warden", started);
        assert!(a.contains("Not connected"));

        let snapshot = StatusSnapshot {
            connected: true,
            server: Some("other.example.net".into()),
            ..Default::default()
        };
        let b = render(&snapshot, "Warden", started);
        assert!(b.contains("other.example.net"));
    }
}
