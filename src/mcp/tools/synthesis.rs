//! Synthesis Tools
//!
//! Final assembly of the context handed to the prompt synthesizer.

use serde::Deserialize;
use serde_json::Value;

use super::{json_result, parse_params};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};
use crate::vocabulary::context::{assemble, ColorSummary, ConstraintSummary, HarmonicSummary};

/// Register synthesis tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(synthesize_prompt_context_tool());
}

// ============================================================================
// synthesize_prompt_context
// ============================================================================

#[derive(Debug, Deserialize)]
struct SynthesizePromptContextParams {
    #[serde(default)]
    image_colors: ColorSummary,
    #[serde(default)]
    harmonic_profile: HarmonicSummary,
    #[serde(default)]
    constraint_params: ConstraintSummary,
    user_intent: String,
    direction: String,
}

fn synthesize_prompt_context_tool() -> RegisteredTool {
    ToolBuilder::new("synthesize_prompt_context")
        .description(
            "Assemble color, harmonic and constraint results into one context packet \
             for prompt synthesis",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "image_colors": {
                    "type": "object",
                    "description": "Output from extract_image_colors"
                },
                "harmonic_profile": {
                    "type": "object",
                    "description": "Output from get_harmonic_profile"
                },
                "constraint_params": {
                    "type": "object",
                    "description": "Output from get_constraint_parameters"
                },
                "user_intent": {
                    "type": "string",
                    "description": "What the user wants to do or create"
                },
                "direction": {
                    "type": "string",
                    "enum": ["forward", "reverse"]
                }
            },
            "required": ["user_intent", "direction"]
        }))
        .build(synthesize_prompt_context_handler)
}

async fn synthesize_prompt_context_handler(_ctx: ToolContext, params: Value) -> ToolResult {
    let params: SynthesizePromptContextParams = parse_params(params)?;

    let context = assemble(
        &params.image_colors,
        &params.harmonic_profile,
        &params.constraint_params,
        &params.user_intent,
        &params.direction,
    );

    json_result(&context)
}
