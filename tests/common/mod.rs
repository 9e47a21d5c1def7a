//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{McpClient, TestServer};
//!
//! #[tokio::test]
//! async fn test_list_tools() {
//!     let server = TestServer::spawn().await;
//!     let mut client = McpClient::connect(&server.ws_url()).await;
//!     client.initialize().await;
//!
//!     let response = client.request("tools/list", serde_json::json!({})).await;
//!     assert!(response["result"]["tools"].is_array());
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::{tool_payload, McpClient};
pub use constants::*;
pub use server::TestServer;
