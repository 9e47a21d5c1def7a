//! End-to-end tests for the vocabulary tools: extraction, mapping, translation,
//! rendering and synthesis.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine};
use common::{
    tool_payload, McpClient, TestServer, CORRUPT_IMAGE, COOL_IMAGE, MISSING_IMAGE,
    TEST_MAX_RENDER_DIMENSION, WARM_IMAGE, WARM_RGB,
};
use image::GenericImageView;
use serde_json::json;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[tokio::test]
async fn test_extract_colors_from_warm_image() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let image_path = server.image_path(WARM_IMAGE);
    let response = client
        .call_tool(
            "extract_image_colors",
            json!({"image_path": image_path.to_str().unwrap()}),
        )
        .await;
    assert!(response["result"].get("isError").is_none());

    let colors = tool_payload(&response);
    let warm = colors["warm_ratio"].as_f64().unwrap();
    let cool = colors["cool_ratio"].as_f64().unwrap();
    assert!(warm > cool);
    assert_eq!(colors["color_balance"]["warm_heavy"], true);
    assert_eq!(colors["color_balance"]["cool_heavy"], false);
    assert_eq!(colors["dominant_colors"][0]["rgb"], json!(WARM_RGB));
}

#[tokio::test]
async fn test_extract_colors_from_cool_image() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let image_path = server.image_path(COOL_IMAGE);
    let colors = tool_payload(
        &client
            .call_tool(
                "extract_image_colors",
                json!({"image_path": image_path.to_str().unwrap()}),
            )
            .await,
    );
    assert_eq!(colors["cool_ratio"], 1.0);
    assert_eq!(colors["color_balance"]["cool_heavy"], true);
}

#[tokio::test]
async fn test_extract_errors_are_tool_errors() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    for name in [MISSING_IMAGE, CORRUPT_IMAGE] {
        let image_path = server.image_path(name);
        let response = client
            .call_tool(
                "extract_image_colors",
                json!({"image_path": image_path.to_str().unwrap()}),
            )
            .await;

        // Reported inside the result, not as a protocol error
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        let payload = tool_payload(&response);
        assert!(!payload["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_harmonic_profile_for_balanced_colors() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let selection = tool_payload(
        &client
            .call_tool(
                "get_harmonic_profile",
                json!({"warm_ratio": 0.33, "cool_ratio": 0.33, "neutral_ratio": 0.34}),
            )
            .await,
    );
    assert_eq!(selection["base_profile"], "harmonic_rich");
    assert_eq!(selection["frequencies"], json!([1.0, 2.0, 3.0, 4.0]));
    assert_eq!(selection["color_mapping"]["neutral_ratio"], 0.34);
}

#[tokio::test]
async fn test_harmonic_profile_for_warm_heavy_colors() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let selection = tool_payload(
        &client
            .call_tool(
                "get_harmonic_profile",
                json!({"warm_ratio": 0.52, "cool_ratio": 0.28, "neutral_ratio": 0.20}),
            )
            .await,
    );
    assert_eq!(selection["base_profile"], "complex_lissajous");
    assert_eq!(selection["selected_profile"], "complex_lissajous");

    let simple = tool_payload(
        &client
            .call_tool(
                "get_harmonic_profile",
                json!({
                    "warm_ratio": 0.52,
                    "cool_ratio": 0.28,
                    "neutral_ratio": 0.20,
                    "complexity_preference": "simple"
                }),
            )
            .await,
    );
    assert_eq!(simple["base_profile"], "complex_lissajous");
    assert_eq!(simple["selected_profile"], "simple");
    assert_eq!(simple["frequencies"], json!([1.0]));
}

#[tokio::test]
async fn test_constraint_parameters_balanced_forward() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let params = tool_payload(
        &client
            .call_tool(
                "get_constraint_parameters",
                json!({"constraint_level": "balanced", "direction": "forward"}),
            )
            .await,
    );
    assert_eq!(params["fidelity"], 0.65);
    assert_eq!(params["color_tolerance"], 0.75);
    assert_eq!(params["fallback"], false);
    assert!(params["narrative"]
        .as_str()
        .unwrap()
        .starts_with("Transform the input image"));
}

#[tokio::test]
async fn test_constraint_parameters_unknown_level_falls_back() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let balanced = tool_payload(
        &client
            .call_tool(
                "get_constraint_parameters",
                json!({"constraint_level": "balanced", "direction": "forward"}),
            )
            .await,
    );
    let unknown = tool_payload(
        &client
            .call_tool(
                "get_constraint_parameters",
                json!({"constraint_level": "unknown_id", "direction": "forward"}),
            )
            .await,
    );

    assert_eq!(unknown["fallback"], true);
    assert_eq!(unknown["resolved_level"], "balanced");
    assert_eq!(unknown["fidelity"], balanced["fidelity"]);
    assert_eq!(unknown["color_tolerance"], balanced["color_tolerance"]);
    assert_eq!(unknown["narrative"], balanced["narrative"]);
    assert_eq!(unknown["instructions"], balanced["instructions"]);
}

#[tokio::test]
async fn test_render_waveform_is_a_valid_png() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let response = client
        .call_tool(
            "render_scope_pattern",
            json!({"frequencies": [1.0], "amplitudes": [1.0], "pattern_type": "waveform"}),
        )
        .await;
    let payload = tool_payload(&response);

    let data_uri = payload["image"].as_str().unwrap();
    assert!(data_uri.starts_with(DATA_URI_PREFIX));
    let png = STANDARD
        .decode(&data_uri[DATA_URI_PREFIX.len()..])
        .expect("Image is not base64");
    let image = image::load_from_memory(&png).expect("Image is not a PNG");
    assert_eq!(image.dimensions(), (400, 300));

    // A sine wave leaves trace pixels well away from the center row
    let rgb = image.to_rgb8();
    let trace_rows: Vec<u32> = rgb
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0 == [0, 255, 150])
        .map(|(_, y, _)| y)
        .collect();
    assert!(!trace_rows.is_empty());
    assert!(trace_rows.iter().any(|&y| y < 100));
    assert!(trace_rows.iter().any(|&y| y > 200));

    let image_block = &response["result"]["content"][1];
    assert_eq!(image_block["type"], "image");
    assert_eq!(image_block["mimeType"], "image/png");
    assert_eq!(
        image_block["data"].as_str().unwrap(),
        &data_uri[DATA_URI_PREFIX.len()..]
    );
}

#[tokio::test]
async fn test_render_lissajous_with_custom_size() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let payload = tool_payload(
        &client
            .call_tool(
                "render_scope_pattern",
                json!({
                    "frequencies": [1.0, 1.5, 2.3],
                    "amplitudes": [1.0, 0.7, 0.4],
                    "pattern_type": "lissajous",
                    "width": 320,
                    "height": 200
                }),
            )
            .await,
    );
    assert_eq!(payload["pattern_type"], "lissajous");
    assert_eq!(payload["width"], 320);
    assert_eq!(payload["height"], 200);

    let data_uri = payload["image"].as_str().unwrap();
    let png = STANDARD.decode(&data_uri[DATA_URI_PREFIX.len()..]).unwrap();
    let image = image::load_from_memory(&png).unwrap();
    assert_eq!(image.dimensions(), (320, 200));
}

#[tokio::test]
async fn test_render_degenerate_inputs_still_produce_images() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    for arguments in [
        json!({"frequencies": [1.0, 2.0], "amplitudes": [0.0, 0.0]}),
        json!({"frequencies": [], "amplitudes": []}),
        json!({"frequencies": [1.0, 2.0, 3.0], "amplitudes": [1.0]}),
    ] {
        let response = client.call_tool("render_scope_pattern", arguments).await;
        assert!(response["result"].get("isError").is_none());
        let payload = tool_payload(&response);
        assert!(payload["image"].as_str().unwrap().starts_with(DATA_URI_PREFIX));
    }
}

#[tokio::test]
async fn test_render_rejects_oversized_canvas() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let response = client
        .call_tool(
            "render_scope_pattern",
            json!({
                "frequencies": [1.0],
                "amplitudes": [1.0],
                "width": TEST_MAX_RENDER_DIMENSION + 1
            }),
        )
        .await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_full_pipeline_synthesis() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let image_path = server.image_path(WARM_IMAGE);
    let colors = tool_payload(
        &client
            .call_tool(
                "extract_image_colors",
                json!({"image_path": image_path.to_str().unwrap()}),
            )
            .await,
    );
    let harmonic = tool_payload(
        &client
            .call_tool(
                "get_harmonic_profile",
                json!({
                    "warm_ratio": colors["warm_ratio"],
                    "cool_ratio": colors["cool_ratio"],
                    "neutral_ratio": colors["neutral_ratio"]
                }),
            )
            .await,
    );
    let constraints = tool_payload(
        &client
            .call_tool(
                "get_constraint_parameters",
                json!({"constraint_level": "strict", "direction": "forward"}),
            )
            .await,
    );

    let context = tool_payload(
        &client
            .call_tool(
                "synthesize_prompt_context",
                json!({
                    "image_colors": colors,
                    "harmonic_profile": harmonic,
                    "constraint_params": constraints,
                    "user_intent": "a desert at dusk",
                    "direction": "forward"
                }),
            )
            .await,
    );

    assert_eq!(context["direction"], "forward");
    assert_eq!(context["user_intent"], "a desert at dusk");
    assert_eq!(context["color_foundation"]["warm"], 1.0);
    assert_eq!(context["harmonic_structure"]["complexity"], "high");
    assert_eq!(context["constraints"]["level"], "strict");
    assert_eq!(context["constraints"]["fidelity"], 0.8);
    let guidance = context["synthesis_guidance"].as_str().unwrap();
    assert!(guidance.contains("~100% warm"));
    assert!(guidance.contains("a desert at dusk"));
}

#[tokio::test]
async fn test_synthesis_with_missing_sections_uses_defaults() {
    let server = TestServer::spawn().await;
    let mut client = McpClient::connect_initialized(&server.ws_url()).await;

    let context = tool_payload(
        &client
            .call_tool(
                "synthesize_prompt_context",
                json!({"user_intent": "something calm", "direction": "reverse"}),
            )
            .await,
    );
    assert_eq!(context["direction"], "reverse");
    assert_eq!(context["constraints"]["level"], "balanced");
    assert_eq!(context["constraints"]["fidelity"], 0.65);
    assert_eq!(context["color_foundation"]["neutral"], 0.34);

    let guidance = context["synthesis_guidance"].as_str().unwrap();
    assert!(guidance.contains("- balanced approach"));
    assert!(guidance.contains("Harmonic complexity: moderate"));
}
