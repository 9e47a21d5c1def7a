//! Taxonomy Tools
//!
//! Harmonic profile mapping, constraint translation and listings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{json_result, parse_params};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};
use crate::vocabulary::color::ColorRatios;
use crate::vocabulary::constraint::{translate, Direction};
use crate::vocabulary::harmonic::{map_colors, ComplexityPreference};
use crate::vocabulary::taxonomy::{
    list_constraint_levels, list_profiles, ConstraintLevelSummary, ProfileSummary,
};

/// Register taxonomy tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(get_harmonic_profile_tool());
    registry.register_tool(get_constraint_parameters_tool());
    registry.register_tool(list_available_profiles_tool());
}

// ============================================================================
// get_harmonic_profile
// ============================================================================

#[derive(Debug, Deserialize)]
struct GetHarmonicProfileParams {
    warm_ratio: f64,
    cool_ratio: f64,
    neutral_ratio: f64,
    #[serde(default = "default_preference")]
    complexity_preference: String,
}

fn default_preference() -> String {
    "balanced".to_string()
}

fn get_harmonic_profile_tool() -> RegisteredTool {
    ToolBuilder::new("get_harmonic_profile")
        .description("Map color ratios to a harmonic frequency profile")
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "warm_ratio": {
                    "type": "number",
                    "description": "Proportion of warm tones (0.0-1.0)"
                },
                "cool_ratio": {
                    "type": "number",
                    "description": "Proportion of cool tones (0.0-1.0)"
                },
                "neutral_ratio": {
                    "type": "number",
                    "description": "Proportion of neutral tones (0.0-1.0)"
                },
                "complexity_preference": {
                    "type": "string",
                    "enum": ["simple", "balanced", "complex"],
                    "description": "Override the color-derived profile (default balanced)"
                }
            },
            "required": ["warm_ratio", "cool_ratio", "neutral_ratio"]
        }))
        .build(get_harmonic_profile_handler)
}

async fn get_harmonic_profile_handler(_ctx: ToolContext, params: Value) -> ToolResult {
    let params: GetHarmonicProfileParams = parse_params(params)?;

    let ratios = ColorRatios {
        warm_ratio: params.warm_ratio,
        cool_ratio: params.cool_ratio,
        neutral_ratio: params.neutral_ratio,
    };
    let preference = ComplexityPreference::from_name(&params.complexity_preference);
    let selection = map_colors(&ratios, &ratios.balance(), preference);

    json_result(&selection)
}

// ============================================================================
// get_constraint_parameters
// ============================================================================

#[derive(Debug, Deserialize)]
struct GetConstraintParametersParams {
    constraint_level: String,
    direction: String,
}

fn get_constraint_parameters_tool() -> RegisteredTool {
    ToolBuilder::new("get_constraint_parameters")
        .description(
            "Get human-readable constraint parameters for prompt synthesis. \
             Unknown levels fall back to 'balanced' and report fallback=true",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "constraint_level": {
                    "type": "string",
                    "enum": ["very_loose", "loose", "balanced", "strict", "very_strict"]
                },
                "direction": {
                    "type": "string",
                    "enum": ["forward", "reverse"],
                    "description": "forward transforms an image, reverse generates from a prompt"
                }
            },
            "required": ["constraint_level", "direction"]
        }))
        .build(get_constraint_parameters_handler)
}

async fn get_constraint_parameters_handler(_ctx: ToolContext, params: Value) -> ToolResult {
    let params: GetConstraintParametersParams = parse_params(params)?;
    let direction = Direction::from_name(&params.direction);
    json_result(&translate(&params.constraint_level, direction))
}

// ============================================================================
// list_available_profiles
// ============================================================================

#[derive(Debug, Serialize)]
struct AvailableProfiles {
    harmonic_profiles: Vec<ProfileSummary>,
    constraint_levels: Vec<ConstraintLevelSummary>,
}

fn list_available_profiles_tool() -> RegisteredTool {
    ToolBuilder::new("list_available_profiles")
        .description("List all available harmonic profiles and constraint levels")
        .build(list_available_profiles_handler)
}

async fn list_available_profiles_handler(_ctx: ToolContext, _params: Value) -> ToolResult {
    json_result(&AvailableProfiles {
        harmonic_profiles: list_profiles(),
        constraint_levels: list_constraint_levels(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;
    use crate::mcp::protocol::{McpError, ToolsCallResult};

    fn ctx() -> ToolContext {
        ToolContext::new(ToolSettings::default())
    }

    fn payload(result: ToolsCallResult) -> Value {
        let value = serde_json::to_value(&result).unwrap();
        serde_json::from_str(value["content"][0]["text"].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_harmonic_profile_for_warm_colors() {
        let result = get_harmonic_profile_handler(
            ctx(),
            serde_json::json!({"warm_ratio": 0.52, "cool_ratio": 0.28, "neutral_ratio": 0.2}),
        )
        .await
        .unwrap();

        let payload = payload(result);
        assert_eq!(payload["base_profile"], "complex_lissajous");
        assert_eq!(payload["frequencies"], serde_json::json!([1.0, 1.5, 2.3]));
        assert_eq!(payload["color_mapping"]["warm_ratio"], 0.52);
    }

    #[tokio::test]
    async fn test_harmonic_profile_preference() {
        let result = get_harmonic_profile_handler(
            ctx(),
            serde_json::json!({
                "warm_ratio": 0.33,
                "cool_ratio": 0.33,
                "neutral_ratio": 0.34,
                "complexity_preference": "complex"
            }),
        )
        .await
        .unwrap();

        let payload = payload(result);
        assert_eq!(payload["base_profile"], "harmonic_rich");
        assert_eq!(payload["selected_profile"], "chaotic");
        assert_eq!(payload["complexity"], "very_high");
    }

    #[tokio::test]
    async fn test_harmonic_profile_rejects_non_numeric_ratio() {
        let result = get_harmonic_profile_handler(
            ctx(),
            serde_json::json!({"warm_ratio": "lots", "cool_ratio": 0.1, "neutral_ratio": 0.1}),
        )
        .await;
        assert!(matches!(result, Err(McpError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_constraint_parameters_fallback() {
        let result = get_constraint_parameters_handler(
            ctx(),
            serde_json::json!({"constraint_level": "unknown_id", "direction": "forward"}),
        )
        .await
        .unwrap();

        let payload = payload(result);
        assert_eq!(payload["fallback"], true);
        assert_eq!(payload["constraint_level"], "unknown_id");
        assert_eq!(payload["fidelity"], 0.65);
        assert_eq!(payload["color_tolerance"], 0.75);
    }

    #[tokio::test]
    async fn test_list_available_profiles() {
        let payload = payload(
            list_available_profiles_handler(ctx(), serde_json::json!({}))
                .await
                .unwrap(),
        );
        assert_eq!(payload["harmonic_profiles"].as_array().unwrap().len(), 4);
        assert_eq!(payload["constraint_levels"].as_array().unwrap().len(), 5);
        assert_eq!(payload["harmonic_profiles"][0]["id"], "simple");
        assert_eq!(payload["constraint_levels"][0]["id"], "very_strict");
    }
}
