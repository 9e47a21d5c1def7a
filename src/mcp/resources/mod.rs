//! MCP Resources
//!
//! Read-only resources exposing the taxonomy tables.

pub mod taxonomy;

use super::registry::McpRegistry;

/// Register all resources with the registry
pub fn register_all_resources(registry: &mut McpRegistry) {
    taxonomy::register_resources(registry);
}
