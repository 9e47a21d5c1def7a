//! Taxonomy Resources
//!
//! Read-only views of the harmonic profile and constraint level tables. Unlike the
//! tools, resources are exact lookups: an unknown id is not found.

use serde::Serialize;

use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ResourceContent};
use crate::mcp::registry::{
    last_uri_segment, McpRegistry, RegisteredResource, ResourceBuilder, ResourceResult,
};
use crate::vocabulary::taxonomy::{
    constraint_level, harmonic_profile, list_constraint_levels, list_profiles, ConstraintLevelId,
    ProfileId,
};

const JSON_MIME: &str = "application/json";

/// Register taxonomy resources with the registry
pub fn register_resources(registry: &mut McpRegistry) {
    registry.register_resource(profiles_resource());
    registry.register_resource(profile_resource());
    registry.register_resource(constraint_levels_resource());
    registry.register_resource(constraint_level_resource());
}

fn json_content<T: Serialize>(uri: String, value: &T) -> ResourceResult {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| McpError::InternalError(e.to_string()))?;
    Ok(vec![ResourceContent {
        uri,
        mime_type: Some(JSON_MIME.to_string()),
        text,
    }])
}

// ============================================================================
// taxonomy://profiles
// ============================================================================

fn profiles_resource() -> RegisteredResource {
    ResourceBuilder::new("taxonomy://profiles", "Harmonic Profiles")
        .description("Summaries of every harmonic profile, sparsest first")
        .mime_type(JSON_MIME)
        .build(|_ctx: ToolContext, uri: String| async move { json_content(uri, &list_profiles()) })
}

fn profile_resource() -> RegisteredResource {
    ResourceBuilder::new("taxonomy://profiles/{id}", "Harmonic Profile")
        .description("Frequencies, amplitudes and complexity of one harmonic profile")
        .mime_type(JSON_MIME)
        .build(profile_handler)
}

async fn profile_handler(_ctx: ToolContext, uri: String) -> ResourceResult {
    let id: ProfileId = last_uri_segment(&uri)
        .parse()
        .map_err(|_| McpError::ResourceNotFound(uri.clone()))?;
    json_content(uri, harmonic_profile(id))
}

// ============================================================================
// taxonomy://constraint-levels
// ============================================================================

fn constraint_levels_resource() -> RegisteredResource {
    ResourceBuilder::new("taxonomy://constraint-levels", "Constraint Levels")
        .description("Summaries of every constraint level, strictest first")
        .mime_type(JSON_MIME)
        .build(|_ctx: ToolContext, uri: String| async move {
            json_content(uri, &list_constraint_levels())
        })
}

fn constraint_level_resource() -> RegisteredResource {
    ResourceBuilder::new("taxonomy://constraint-levels/{id}", "Constraint Level")
        .description("Fidelity, tolerances and suggested profile of one constraint level")
        .mime_type(JSON_MIME)
        .build(constraint_level_handler)
}

async fn constraint_level_handler(_ctx: ToolContext, uri: String) -> ResourceResult {
    let id: ConstraintLevelId = last_uri_segment(&uri)
        .parse()
        .map_err(|_| McpError::ResourceNotFound(uri.clone()))?;
    json_content(uri, constraint_level(id))
}
