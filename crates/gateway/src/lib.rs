//! HTTP gateway for AFKWarden.
//!
//! Exposes the read-only status page, a health probe, and the WebSocket
//! live-transport endpoint for dashboard clients. Serving of the dashboard's
//! static assets is an external concern; this gateway only carries state
//! and events.
//!
//! Built on Axum for high performance async HTTP.

pub mod status_page;
pub mod ws;

use axum::{Router, http::Method, response::Json, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use warden_core::command::CommandRouter;
use warden_core::error::ChannelError;
use warden_core::hub::BroadcastHub;
use warden_core::logger::Logger;
use warden_core::status::StatusAggregator;

/// Shared application state for the gateway.
///
/// All interior mutability lives behind the hub; the state itself is
/// immutable once built.
pub struct GatewayState {
    pub hub: Arc<BroadcastHub>,
    pub router: Arc<CommandRouter>,
    pub aggregator: Arc<StatusAggregator>,
    pub logger: Logger,
    pub config: warden_config::AppConfig,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Dashboard assets are served elsewhere, so cross-origin GETs and
/// WebSocket upgrades must be allowed.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(status_page::status_page_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws::ws_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server. Runs until the process shuts down.
pub async fn start(state: SharedState) -> Result<(), ChannelError> {
    let addr = format!("{}:{}", state.config.gateway.host, state.config.gateway.port);
    let port = state.config.gateway.port;
    let logger = state.logger.clone();

    let app = build_router(state);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ChannelError::BindFailed {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;

    logger.info(format!("Web interface started on port {port}"));
    logger.info(format!(
        "Access the control panel at http://localhost:{port}"
    ));
    info!(addr = %addr, "Gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ChannelError::ConnectionLost(e.to_string()))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint() {
        let (state, _) = test_support::state_with(Ok(test_support::connected_status()));
        let app = build_router(state);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("\"ok\""));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (state, _) = test_support::state_with(Ok(test_support::connected_status()));
        let app = build_router(state);

        let req = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
