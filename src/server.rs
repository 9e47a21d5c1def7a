//! HTTP server hosting the WebSocket MCP transport.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{FromRef, State},
    http::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ToolSettings;
use crate::mcp::{create_mcp_state, mcp_handler, McpState};

pub type GuardedMcpState = Arc<McpState>;

#[derive(Clone)]
pub struct ServerState {
    pub start_time: Instant,
    pub hash: String,
    pub mcp_state: GuardedMcpState,
}

impl ServerState {
    pub fn new(mcp_state: McpState) -> ServerState {
        ServerState {
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_owned(),
            mcp_state: Arc::new(mcp_state),
        }
    }
}

impl FromRef<ServerState> for GuardedMcpState {
    fn from_ref(input: &ServerState) -> Self {
        input.mcp_state.clone()
    }
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub version: String,
    pub tools: usize,
    pub resources: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let registry = &state.mcp_state.registry;
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        version: state.mcp_state.context.server_version.clone(),
        tools: registry.tool_count(),
        resources: registry.resource_count(),
    };
    Json(stats)
}

async fn log_requests(request: Request<Body>, next: Next) -> impl IntoResponse {
    let start = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    info!(">>> {} {}", method, uri);
    let response = next.run(request).await;
    debug!(
        "<<< {} {} {} ({}ms)",
        response.status().as_u16(),
        method,
        uri,
        start.elapsed().as_millis()
    );

    response
}

pub fn make_app(state: ServerState) -> Router {
    let mcp_routes: Router = Router::new()
        .route("/v1/mcp", get(mcp_handler))
        .with_state(state.mcp_state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state)
        .merge(mcp_routes)
        .layer(middleware::from_fn(log_requests))
}

/// Serve MCP over WebSocket on `127.0.0.1:{port}` until the process exits.
pub async fn run_server(settings: ToolSettings, port: u16) -> Result<()> {
    let state = ServerState::new(create_mcp_state(settings));
    let app = make_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on ws://{}/v1/mcp", addr);

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(59)), "0d 00:00:59");
        assert_eq!(format_uptime(Duration::from_secs(3_661)), "0d 01:01:01");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }

    #[test]
    fn test_server_state_shares_mcp_state() {
        let state = ServerState::new(create_mcp_state(ToolSettings::default()));
        let mcp: GuardedMcpState = GuardedMcpState::from_ref(&state);
        assert!(Arc::ptr_eq(&mcp, &state.mcp_state));
        assert_eq!(mcp.registry.tool_count(), 6);
        assert_eq!(mcp.registry.resource_count(), 4);
    }
}
