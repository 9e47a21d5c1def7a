//! MCP Tool Execution Context
//!
//! Provides access to server settings for tool implementations.

use std::sync::Arc;

use crate::config::ToolSettings;

/// Context provided to tool and resource handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Limits applied by the tools
    pub settings: Arc<ToolSettings>,

    /// Server version info
    pub server_version: String,
}

impl ToolContext {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            server_version: server_version(),
        }
    }
}

/// `<crate version>-<git hash>`
pub fn server_version() -> String {
    format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"))
}
