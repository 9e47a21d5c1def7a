//! MCP Message Handler
//!
//! Dispatches JSON-RPC messages to the registry. Transports (WebSocket here, stdio in
//! [`super::stdio`]) own one [`McpSession`] per client and feed it raw text frames.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tracing::{debug, error, info};

use super::context::ToolContext;
use super::protocol::{
    methods, InitializeParams, InitializeResult, McpError, McpRequest, McpResponse, PingResult,
    ResourcesCapability, ResourcesListResult, ResourcesReadParams, ResourcesReadResult,
    ServerCapabilities, ServerInfo, ToolsCallParams, ToolsCapability, ToolsListResult,
    JSONRPC_VERSION, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use super::registry::McpRegistry;
use crate::config::ToolSettings;

/// State shared across MCP connections
pub struct McpState {
    pub registry: Arc<McpRegistry>,
    pub context: ToolContext,
}

/// Per-connection protocol state
#[derive(Debug, Default)]
pub struct McpSession {
    initialized: bool,
    shutdown_requested: bool,
}

impl McpSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True once the client sent `shutdown`; the transport should stop reading.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }
}

/// WebSocket upgrade handler for MCP
pub async fn mcp_handler(ws: WebSocketUpgrade, State(mcp_state): State<Arc<McpState>>) -> Response {
    info!("MCP WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_mcp_socket(socket, mcp_state))
}

/// Handle an established MCP WebSocket connection
async fn handle_mcp_socket(socket: WebSocket, mcp_state: Arc<McpState>) {
    debug!("MCP connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let mut session = McpSession::new();

    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let response = handle_message(text.as_str(), &mcp_state, &mut session).await;

                if let Some(response) = response {
                    match serde_json::to_string(&response) {
                        Ok(json) => {
                            if ws_sink.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Failed to serialize MCP response: {}", e);
                        }
                    }
                }

                if session.shutdown_requested() {
                    let _ = ws_sink.send(Message::Close(None)).await;
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                debug!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                // Axum/tungstenite handles pong automatically
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!("Received close frame");
                break;
            }
            Err(e) => {
                debug!("WebSocket error: {}", e);
                break;
            }
        }
    }

    debug!("MCP connection closed");
}

/// Handle a single MCP message.
///
/// Returns `None` for notifications, which never get a response.
pub async fn handle_message(
    text: &str,
    mcp_state: &McpState,
    session: &mut McpSession,
) -> Option<McpResponse> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            return Some(McpResponse::error(
                None,
                McpError::ParseError(e.to_string()),
            ));
        }
    };

    let request: McpRequest = match serde_json::from_value(value) {
        Ok(req) => req,
        Err(e) => {
            return Some(McpResponse::error(
                None,
                McpError::InvalidRequest(e.to_string()),
            ));
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return Some(McpResponse::error(
            request.id,
            McpError::InvalidRequest(format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
        ));
    }

    debug!("MCP {} (id: {:?})", request.method, request.id);

    if request.is_notification() {
        handle_notification(&request);
        return None;
    }

    // Dispatch based on method
    let result = match request.method.as_str() {
        methods::INITIALIZE => handle_initialize(&request, mcp_state, session).await,
        methods::PING => handle_ping(&request).await,
        methods::TOOLS_LIST => match require_initialized(session) {
            Ok(()) => handle_tools_list(mcp_state).await,
            Err(e) => Err(e),
        },
        methods::TOOLS_CALL => match require_initialized(session) {
            Ok(()) => handle_tools_call(&request, mcp_state).await,
            Err(e) => Err(e),
        },
        methods::RESOURCES_LIST => match require_initialized(session) {
            Ok(()) => handle_resources_list(mcp_state).await,
            Err(e) => Err(e),
        },
        methods::RESOURCES_READ => match require_initialized(session) {
            Ok(()) => handle_resources_read(&request, mcp_state).await,
            Err(e) => Err(e),
        },
        methods::SHUTDOWN => {
            // Client is disconnecting gracefully
            session.shutdown_requested = true;
            Ok(serde_json::json!({}))
        }
        other => Err(McpError::MethodNotFound(other.to_string())),
    };

    Some(match result {
        Ok(value) => McpResponse::success(request.id, value),
        Err(error) => {
            debug!("MCP {} failed: {}", request.method, error.message());
            McpResponse::error(request.id, error)
        }
    })
}

fn handle_notification(request: &McpRequest) {
    match request.method.as_str() {
        methods::INITIALIZED => debug!("Client finished initialization"),
        other => debug!("Ignoring notification {}", other),
    }
}

fn require_initialized(session: &McpSession) -> Result<(), McpError> {
    if session.initialized {
        Ok(())
    } else {
        Err(McpError::InvalidRequest("Not initialized".to_string()))
    }
}

async fn handle_initialize(
    request: &McpRequest,
    mcp_state: &McpState,
    session: &mut McpSession,
) -> Result<Value, McpError> {
    let params: Option<InitializeParams> = request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?;

    if let Some(params) = &params {
        info!(
            "MCP client {} {} (protocol {})",
            params.client_info.name, params.client_info.version, params.protocol_version
        );
    }

    session.initialized = true;

    let result = InitializeResult {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability { list_changed: None }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: None,
            }),
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: mcp_state.context.server_version.clone(),
        },
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_ping(_request: &McpRequest) -> Result<Value, McpError> {
    serde_json::to_value(PingResult {}).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_tools_list(mcp_state: &McpState) -> Result<Value, McpError> {
    let result = ToolsListResult {
        tools: mcp_state.registry.list_tools(),
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_tools_call(request: &McpRequest, mcp_state: &McpState) -> Result<Value, McpError> {
    let params: ToolsCallParams = request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

    let tool = mcp_state
        .registry
        .get_tool(&params.name)
        .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", params.name)))?;

    debug!("Calling tool {}", tool.name);

    // Execute the tool
    let arguments = params.arguments.unwrap_or(serde_json::json!({}));
    let result = (tool.handler)(mcp_state.context.clone(), arguments).await?;

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_resources_list(mcp_state: &McpState) -> Result<Value, McpError> {
    let result = ResourcesListResult {
        resources: mcp_state.registry.list_resources(),
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_resources_read(
    request: &McpRequest,
    mcp_state: &McpState,
) -> Result<Value, McpError> {
    let params: ResourcesReadParams = request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

    // Find matching resource
    let resource = mcp_state
        .registry
        .find_resource(&params.uri)
        .ok_or_else(|| McpError::ResourceNotFound(params.uri.clone()))?;

    // Read the resource
    let contents = (resource.handler)(mcp_state.context.clone(), params.uri).await?;

    let result = ResourcesReadResult { contents };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

/// Create the MCP state with registered tools and resources
pub fn create_mcp_state(settings: ToolSettings) -> McpState {
    let mut registry = McpRegistry::new();

    // Register all tools
    super::tools::register_all_tools(&mut registry);

    // Register all resources
    super::resources::register_all_resources(&mut registry);

    info!(
        "MCP registry initialized with {} tools and {} resources",
        registry.tool_count(),
        registry.resource_count()
    );

    McpState {
        registry: Arc::new(registry),
        context: ToolContext::new(settings),
    }
}
