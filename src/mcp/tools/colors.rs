//! Color Tools
//!
//! Extraction of warm/cool/neutral composition from image files.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{json_result, parse_params};
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};
use crate::vocabulary::color::{extract_colors, ColorComposition, ExtractionError};

/// Register color tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(extract_image_colors_tool());
}

// ============================================================================
// extract_image_colors
// ============================================================================

#[derive(Debug, Deserialize)]
struct ExtractImageColorsParams {
    image_path: String,
}

fn extract_image_colors_tool() -> RegisteredTool {
    ToolBuilder::new("extract_image_colors")
        .description(
            "Extract color composition from an image: warm/cool/neutral ratios, \
             up to 5 dominant colors and balance flags",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "image_path": {
                    "type": "string",
                    "description": "Path to the image file"
                }
            },
            "required": ["image_path"]
        }))
        .build(extract_image_colors_handler)
}

async fn extract_image_colors_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: ExtractImageColorsParams = parse_params(params)?;

    match run_extraction(&ctx, PathBuf::from(&params.image_path)).await {
        Ok(composition) => json_result(&composition),
        Err(e) => {
            warn!("Color extraction failed for {}: {}", params.image_path, e);
            Ok(ToolsCallResult::error(e.to_string()))
        }
    }
}

/// Decode on the blocking pool, bounded by the configured timeout.
async fn run_extraction(
    ctx: &ToolContext,
    path: PathBuf,
) -> Result<ColorComposition, ExtractionError> {
    let timeout = ctx.settings.extract_timeout;
    let max_bytes = ctx.settings.max_image_bytes;
    debug!("Extracting colors from {:?}", path);

    let task = tokio::task::spawn_blocking(move || extract_colors(&path, max_bytes));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ExtractionError::Aborted(join_error.to_string())),
        Err(_) => Err(ExtractionError::TimedOut(timeout.as_secs())),
    }
}
