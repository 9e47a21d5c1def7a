//! MCP Tools
//!
//! Tool implementations for color extraction, taxonomy mapping, rendering and
//! context synthesis.

pub mod colors;
pub mod rendering;
pub mod synthesis;
pub mod taxonomy;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::protocol::{McpError, ToolsCallResult};
use super::registry::{McpRegistry, ToolResult};

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut McpRegistry) {
    colors::register_tools(registry);
    taxonomy::register_tools(registry);
    rendering::register_tools(registry);
    synthesis::register_tools(registry);
}

/// Deserialize tool arguments, reporting failures as invalid params
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, McpError> {
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Wrap a serializable payload as a pretty-printed JSON text result
pub(crate) fn json_result<T: Serialize>(value: &T) -> ToolResult {
    ToolsCallResult::json(value).map_err(|e| McpError::InternalError(e.to_string()))
}

/// Run CPU-bound tool work on the blocking pool. A task that panics or is
/// cancelled surfaces as `ToolExecutionFailed`.
pub(crate) async fn run_blocking<T, F>(tool: &str, work: F) -> Result<T, McpError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| McpError::ToolExecutionFailed(format!("{}: {}", tool, e)))
}
