//! Synthesis context assembly.
//!
//! Merges the color, harmonic and constraint results into the single payload a prompt
//! synthesizer consumes. Every input field is optional; missing fields take neutral
//! defaults so partially filled payloads from remote callers still assemble.

use serde::{Deserialize, Serialize};

use super::color::{ColorComposition, ColorRatios, DominantColor};
use super::constraint::{ConstraintParams, Instructions};
use super::harmonic::HarmonicSelection;
use super::taxonomy::{constraint_level, Complexity, DEFAULT_CONSTRAINT_LEVEL};
use super::whole_percent;

const DEFAULT_NARRATIVE: &str = "balanced approach";
const DEFAULT_HARMONIC_DESCRIPTION: &str = "moderate";

/// Color fields the assembler reads. Matches the shape of a [`ColorComposition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSummary {
    pub warm_ratio: Option<f64>,
    pub cool_ratio: Option<f64>,
    pub neutral_ratio: Option<f64>,
    pub dominant_colors: Vec<DominantColor>,
}

impl From<&ColorComposition> for ColorSummary {
    fn from(composition: &ColorComposition) -> Self {
        Self {
            warm_ratio: Some(composition.warm_ratio),
            cool_ratio: Some(composition.cool_ratio),
            neutral_ratio: Some(composition.neutral_ratio),
            dominant_colors: composition.dominant_colors.clone(),
        }
    }
}

/// Harmonic fields the assembler reads. Matches the shape of a [`HarmonicSelection`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicSummary {
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub description: Option<String>,
    pub complexity: Option<Complexity>,
}

impl From<&HarmonicSelection> for HarmonicSummary {
    fn from(selection: &HarmonicSelection) -> Self {
        Self {
            frequencies: selection.frequencies.to_vec(),
            amplitudes: selection.amplitudes.to_vec(),
            description: Some(selection.description.to_string()),
            complexity: Some(selection.complexity),
        }
    }
}

/// Constraint fields the assembler reads. Matches the shape of [`ConstraintParams`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSummary {
    pub constraint_level: Option<String>,
    pub narrative: Option<String>,
    pub fidelity: Option<f64>,
    pub color_tolerance: Option<f64>,
    pub instructions: Option<Instructions>,
}

impl From<&ConstraintParams> for ConstraintSummary {
    fn from(params: &ConstraintParams) -> Self {
        Self {
            constraint_level: Some(params.constraint_level.clone()),
            narrative: Some(params.narrative.clone()),
            fidelity: Some(params.fidelity),
            color_tolerance: Some(params.color_tolerance),
            instructions: Some(params.instructions.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorFoundation {
    pub warm: f64,
    pub cool: f64,
    pub neutral: f64,
    pub dominant_colors: Vec<DominantColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicStructure {
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub description: String,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintSection {
    pub level: String,
    pub narrative: String,
    pub fidelity: f64,
    pub color_tolerance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
}

/// Everything the prompt synthesizer needs in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisContext {
    /// The caller's direction, echoed as given.
    pub direction: String,
    pub user_intent: String,
    pub color_foundation: ColorFoundation,
    pub harmonic_structure: HarmonicStructure,
    pub constraints: ConstraintSection,
    pub synthesis_guidance: String,
}

pub fn assemble(
    colors: &ColorSummary,
    harmonic: &HarmonicSummary,
    constraints: &ConstraintSummary,
    user_intent: &str,
    direction: &str,
) -> SynthesisContext {
    let defaults = ColorRatios::default();
    let warm = colors.warm_ratio.unwrap_or(defaults.warm_ratio);
    let cool = colors.cool_ratio.unwrap_or(defaults.cool_ratio);
    let neutral = colors.neutral_ratio.unwrap_or(defaults.neutral_ratio);
    let default_level = constraint_level(DEFAULT_CONSTRAINT_LEVEL);

    let synthesis_guidance = [
        "Use these constraints when synthesizing the image prompt:".to_string(),
        format!("- Direction: {}", direction),
        format!("- Intent: {}", user_intent),
        format!(
            "- {}",
            constraints.narrative.as_deref().unwrap_or(DEFAULT_NARRATIVE)
        ),
        format!(
            "- Color ratios: ~{}% warm, ~{}% cool, ~{}% neutral",
            whole_percent(warm),
            whole_percent(cool),
            whole_percent(neutral)
        ),
        format!(
            "- Harmonic complexity: {}",
            harmonic
                .description
                .as_deref()
                .unwrap_or(DEFAULT_HARMONIC_DESCRIPTION)
        ),
    ]
    .join("\n");

    SynthesisContext {
        direction: direction.to_string(),
        user_intent: user_intent.to_string(),
        color_foundation: ColorFoundation {
            warm,
            cool,
            neutral,
            dominant_colors: colors.dominant_colors.clone(),
        },
        harmonic_structure: HarmonicStructure {
            frequencies: harmonic.frequencies.clone(),
            amplitudes: harmonic.amplitudes.clone(),
            description: harmonic.description.clone().unwrap_or_default(),
            complexity: harmonic.complexity.unwrap_or_default(),
        },
        constraints: ConstraintSection {
            level: constraints
                .constraint_level
                .clone()
                .unwrap_or_else(|| DEFAULT_CONSTRAINT_LEVEL.to_string()),
            narrative: constraints.narrative.clone().unwrap_or_default(),
            fidelity: constraints.fidelity.unwrap_or(default_level.fidelity),
            color_tolerance: constraints
                .color_tolerance
                .unwrap_or(default_level.color_tolerance),
            instructions: constraints.instructions.clone(),
        },
        synthesis_guidance,
    }
}
