//! Constraint level to human-readable synthesis instructions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::taxonomy::{lookup_constraint_level, ConstraintLevelId, ProfileId};
use super::whole_percent;

/// Extra factor applied to `complexity_delta` before percentage formatting. Existing
/// consumers read "Allow 250% complexity variation" for the balanced level.
pub const COMPLEXITY_DELTA_SCALE: f64 = 10.0;

/// Which way the synthesis runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Transform an existing image.
    #[default]
    Forward,
    /// Generate from a textual intent.
    Reverse,
}

impl Direction {
    /// Only the exact string `forward` selects [`Direction::Forward`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "forward" => Direction::Forward,
            "reverse" => Direction::Reverse,
            other => {
                debug!(direction = other, "Unrecognized direction, treating as reverse");
                Direction::Reverse
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    pub fidelity: String,
    pub color: String,
    pub complexity: String,
}

/// A constraint level rendered for the synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintParams {
    /// The level name as requested, even when it was not recognized.
    pub constraint_level: String,
    pub resolved_level: ConstraintLevelId,
    /// True when `constraint_level` was unknown and the default level was used.
    pub fallback: bool,
    pub narrative: String,
    pub fidelity: f64,
    pub color_tolerance: f64,
    pub complexity_delta: f64,
    pub suggested_harmonic_profile: ProfileId,
    pub instructions: Instructions,
}

/// Translate a constraint level name.
///
/// Unknown names resolve to the balanced level and set `fallback`.
pub fn translate(level_name: &str, direction: Direction) -> ConstraintParams {
    let lookup = lookup_constraint_level(level_name);
    let level = lookup.entry;
    let description = level.description.to_lowercase();

    let narrative = match direction {
        Direction::Forward => format!("Transform the input image with {}", description),
        Direction::Reverse => format!(
            "Guide image generation from user prompt with {}",
            description
        ),
    };

    let complexity_percent = (level.complexity_delta * 100.0 * COMPLEXITY_DELTA_SCALE) as i64;

    ConstraintParams {
        constraint_level: level_name.to_string(),
        resolved_level: level.id,
        fallback: lookup.fallback,
        narrative,
        fidelity: level.fidelity,
        color_tolerance: level.color_tolerance,
        complexity_delta: level.complexity_delta,
        suggested_harmonic_profile: level.profile,
        instructions: Instructions {
            fidelity: format!(
                "Maintain {}% structural fidelity to source",
                whole_percent(level.fidelity)
            ),
            color: format!(
                "Keep color ratios within {}% tolerance",
                whole_percent(level.color_tolerance)
            ),
            complexity: format!("Allow {}% complexity variation", complexity_percent),
        },
    }
}
