//! Oscilloscope Vocabulary Library
//!
//! Translates image color balance into harmonic profiles, maps fidelity levels to
//! generation parameters, renders oscilloscope patterns and assembles synthesis
//! context. Everything is served to LLM clients as MCP tools.

pub mod config;
pub mod mcp;
pub mod server;
pub mod vocabulary;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ToolSettings, TransportKind};
pub use mcp::{create_mcp_state, McpState};
pub use server::{make_app, run_server, ServerState};
