//! Rendering Tools
//!
//! Oscilloscope pattern rendering, returned both as a data URI in the JSON payload
//! and as an MCP image block.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use super::{json_result, parse_params, run_blocking};
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};
use crate::vocabulary::render::{render, PatternKind, RenderSpec};

/// Register rendering tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(render_scope_pattern_tool());
}

// ============================================================================
// render_scope_pattern
// ============================================================================

#[derive(Debug, Deserialize)]
struct RenderScopePatternParams {
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
    #[serde(default = "default_pattern_type")]
    pattern_type: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

fn default_pattern_type() -> String {
    "waveform".to_string()
}

#[derive(Debug, Serialize)]
struct RenderScopePatternResult {
    image: String,
    description: &'static str,
    pattern_type: String,
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
    width: u32,
    height: u32,
}

fn render_scope_pattern_tool() -> RegisteredTool {
    ToolBuilder::new("render_scope_pattern")
        .description(
            "Render an oscilloscope pattern as a PNG. Waveforms default to 400x300, \
             Lissajous curves to 400x400",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "frequencies": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Frequency multipliers (1.0 is the fundamental)"
                },
                "amplitudes": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Amplitude of each frequency"
                },
                "pattern_type": {
                    "type": "string",
                    "enum": ["waveform", "lissajous"],
                    "description": "Pattern to draw (default waveform)"
                },
                "width": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Canvas width in pixels"
                },
                "height": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Canvas height in pixels"
                }
            },
            "required": ["frequencies", "amplitudes"]
        }))
        .build(render_scope_pattern_handler)
}

async fn render_scope_pattern_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: RenderScopePatternParams = parse_params(params)?;

    let kind = PatternKind::from_name(&params.pattern_type);
    let (default_width, default_height) = kind.default_size();
    let width = params.width.unwrap_or(default_width);
    let height = params.height.unwrap_or(default_height);

    let max = ctx.settings.max_render_dimension;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(McpError::InvalidParams(format!(
            "Canvas {}x{} outside the allowed range 1..={}",
            width, height, max
        )));
    }

    let spec = RenderSpec::new(params.frequencies, params.amplitudes, kind).with_size(width, height);
    let rendered = run_blocking("render_scope_pattern", move || {
        render(&spec).map(|image| (image, spec))
    })
    .await?;

    let (image, spec) = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Failed to render {} pattern: {}", kind.as_str(), e);
            return Ok(ToolsCallResult::error(e.to_string()));
        }
    };

    let base64_png = image.base64_png().to_string();
    let result = RenderScopePatternResult {
        image: image.data_uri,
        description: kind.description(),
        pattern_type: params.pattern_type,
        frequencies: spec.frequencies,
        amplitudes: spec.amplitudes,
        width: image.width,
        height: image.height,
    };

    Ok(json_result(&result)?.with_image(base64_png, "image/png"))
}
