//! MCP (Model Context Protocol) Server
//!
//! Exposes the oscilloscope vocabulary as tools and read-only resources that LLM
//! clients can call while translating between images and prompts.
//!
//! ## Architecture
//!
//! - Transports: line-delimited JSON over stdio, or WebSocket at `/v1/mcp`
//! - Tools: stateless, one per vocabulary operation
//! - Resources: read-only views of the taxonomy tables

pub mod context;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod stdio;
pub mod tools;

pub use handler::{create_mcp_state, handle_message, mcp_handler, McpSession, McpState};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use registry::McpRegistry;
