//! Taxonomy Tables
//!
//! Process-wide, read-only registries of harmonic profiles and constraint levels.
//! Name lookups never fail: an unknown name resolves to a designated default entry
//! and the returned [`Lookup`] records that the fallback happened.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a harmonic profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    Simple,
    HarmonicRich,
    ComplexLissajous,
    Chaotic,
}

impl ProfileId {
    /// All profiles, from the sparsest to the densest.
    pub const ALL: [ProfileId; 4] = [
        ProfileId::Simple,
        ProfileId::HarmonicRich,
        ProfileId::ComplexLissajous,
        ProfileId::Chaotic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::Simple => "simple",
            ProfileId::HarmonicRich => "harmonic_rich",
            ProfileId::ComplexLissajous => "complex_lissajous",
            ProfileId::Chaotic => "chaotic",
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownIdentifier(s.to_string()))
    }
}

/// Identifier of a constraint level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintLevelId {
    VeryStrict,
    Strict,
    Balanced,
    Loose,
    VeryLoose,
}

impl ConstraintLevelId {
    /// All levels, from the strictest to the loosest.
    pub const ORDERED: [ConstraintLevelId; 5] = [
        ConstraintLevelId::VeryStrict,
        ConstraintLevelId::Strict,
        ConstraintLevelId::Balanced,
        ConstraintLevelId::Loose,
        ConstraintLevelId::VeryLoose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintLevelId::VeryStrict => "very_strict",
            ConstraintLevelId::Strict => "strict",
            ConstraintLevelId::Balanced => "balanced",
            ConstraintLevelId::Loose => "loose",
            ConstraintLevelId::VeryLoose => "very_loose",
        }
    }
}

impl fmt::Display for ConstraintLevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintLevelId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstraintLevelId::ORDERED
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownIdentifier(s.to_string()))
    }
}

/// Returned when parsing an identifier that is not in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown identifier: {0}")]
pub struct UnknownIdentifier(pub String);

/// Harmonic complexity tag, ordered from `Low` to `VeryHigh`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

// ============================================================================
// Entries
// ============================================================================

/// A named set of frequency multipliers and their relative amplitudes.
///
/// `frequencies` and `amplitudes` always have the same, non-zero length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicProfile {
    pub id: ProfileId,
    pub frequencies: &'static [f64],
    pub amplitudes: &'static [f64],
    pub description: &'static str,
    pub complexity: Complexity,
}

/// A point on the fidelity / creative-freedom spectrum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintLevel {
    pub id: ConstraintLevelId,
    pub fidelity: f64,
    pub color_tolerance: f64,
    pub complexity_delta: f64,
    pub description: &'static str,
    pub profile: ProfileId,
}

/// Result of a name lookup that may have fallen back to the default entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup<T> {
    pub entry: T,
    pub fallback: bool,
}

/// Target of [`lookup_profile`] for unrecognized names.
pub const DEFAULT_PROFILE: ProfileId = ProfileId::HarmonicRich;

/// Target of [`lookup_constraint_level`] for unrecognized names.
pub const DEFAULT_CONSTRAINT_LEVEL: ConstraintLevelId = ConstraintLevelId::Balanced;

static PROFILES: [HarmonicProfile; 4] = [
    HarmonicProfile {
        id: ProfileId::Simple,
        frequencies: &[1.0],
        amplitudes: &[1.0],
        description: "Pure fundamental tone, clean sine wave",
        complexity: Complexity::Low,
    },
    HarmonicProfile {
        id: ProfileId::HarmonicRich,
        frequencies: &[1.0, 2.0, 3.0, 4.0],
        amplitudes: &[1.0, 0.5, 0.33, 0.25],
        description: "Rich harmonic series, complex waveform with overtones",
        complexity: Complexity::Medium,
    },
    HarmonicProfile {
        id: ProfileId::ComplexLissajous,
        frequencies: &[1.0, 1.5, 2.3],
        amplitudes: &[1.0, 0.7, 0.4],
        description: "Inharmonic ratios create Lissajous patterns",
        complexity: Complexity::High,
    },
    HarmonicProfile {
        id: ProfileId::Chaotic,
        frequencies: &[1.0, 2.7, 3.2, 4.8, 5.1],
        amplitudes: &[1.0, 0.6, 0.4, 0.3, 0.2],
        description: "Dense frequency content, intricate waveform",
        complexity: Complexity::VeryHigh,
    },
];

static CONSTRAINT_LEVELS: [ConstraintLevel; 5] = [
    ConstraintLevel {
        id: ConstraintLevelId::VeryStrict,
        fidelity: 0.95,
        color_tolerance: 0.98,
        complexity_delta: 0.05,
        description: "Strict fidelity to structure and color ratios",
        profile: ProfileId::Simple,
    },
    ConstraintLevel {
        id: ConstraintLevelId::Strict,
        fidelity: 0.8,
        color_tolerance: 0.9,
        complexity_delta: 0.1,
        description: "Tight harmonic adherence, minimal deviation",
        profile: ProfileId::HarmonicRich,
    },
    ConstraintLevel {
        id: ConstraintLevelId::Balanced,
        fidelity: 0.65,
        color_tolerance: 0.75,
        complexity_delta: 0.25,
        description: "Balanced between constraint and freedom",
        profile: ProfileId::HarmonicRich,
    },
    ConstraintLevel {
        id: ConstraintLevelId::Loose,
        fidelity: 0.5,
        color_tolerance: 0.65,
        complexity_delta: 0.4,
        description: "Relaxed constraints, creative exploration",
        profile: ProfileId::ComplexLissajous,
    },
    ConstraintLevel {
        id: ConstraintLevelId::VeryLoose,
        fidelity: 0.3,
        color_tolerance: 0.5,
        complexity_delta: 0.6,
        description: "Loose interpretation, significant creative freedom",
        profile: ProfileId::Chaotic,
    },
];

lazy_static! {
    static ref PROFILES_BY_NAME: HashMap<&'static str, &'static HarmonicProfile> = PROFILES
        .iter()
        .map(|profile| (profile.id.as_str(), profile))
        .collect();
    static ref CONSTRAINT_LEVELS_BY_NAME: HashMap<&'static str, &'static ConstraintLevel> =
        CONSTRAINT_LEVELS
            .iter()
            .map(|level| (level.id.as_str(), level))
            .collect();
}

// ============================================================================
// Lookups
// ============================================================================

/// Get the profile for a known id.
pub fn harmonic_profile(id: ProfileId) -> &'static HarmonicProfile {
    // Table order matches `ProfileId::ALL`
    &PROFILES[id as usize]
}

/// Get the constraint level for a known id.
pub fn constraint_level(id: ConstraintLevelId) -> &'static ConstraintLevel {
    // Table order matches `ConstraintLevelId::ORDERED`
    &CONSTRAINT_LEVELS[id as usize]
}

/// Look up a profile by name, falling back to [`DEFAULT_PROFILE`].
///
/// For library callers holding a profile name as a string. Typed ids go through
/// [`harmonic_profile`], and the MCP resources use exact lookups instead.
pub fn lookup_profile(name: &str) -> Lookup<&'static HarmonicProfile> {
    match PROFILES_BY_NAME.get(name) {
        Some(profile) => Lookup {
            entry: *profile,
            fallback: false,
        },
        None => {
            warn!(
                requested = name,
                fallback = DEFAULT_PROFILE.as_str(),
                "Unknown harmonic profile, using default"
            );
            Lookup {
                entry: harmonic_profile(DEFAULT_PROFILE),
                fallback: true,
            }
        }
    }
}

/// Look up a constraint level by name, falling back to [`DEFAULT_CONSTRAINT_LEVEL`].
pub fn lookup_constraint_level(name: &str) -> Lookup<&'static ConstraintLevel> {
    match CONSTRAINT_LEVELS_BY_NAME.get(name) {
        Some(level) => Lookup {
            entry: *level,
            fallback: false,
        },
        None => {
            warn!(
                requested = name,
                fallback = DEFAULT_CONSTRAINT_LEVEL.as_str(),
                "Unknown constraint level, using default"
            );
            Lookup {
                entry: constraint_level(DEFAULT_CONSTRAINT_LEVEL),
                fallback: true,
            }
        }
    }
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub description: &'static str,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintLevelSummary {
    pub id: ConstraintLevelId,
    pub description: &'static str,
    pub fidelity: f64,
    pub color_tolerance: f64,
}

/// Summaries of every profile, sparsest first.
pub fn list_profiles() -> Vec<ProfileSummary> {
    PROFILES
        .iter()
        .map(|profile| ProfileSummary {
            id: profile.id,
            description: profile.description,
            complexity: profile.complexity,
        })
        .collect()
}

/// Summaries of every constraint level, strictest first.
pub fn list_constraint_levels() -> Vec<ConstraintLevelSummary> {
    CONSTRAINT_LEVELS
        .iter()
        .map(|level| ConstraintLevelSummary {
            id: level.id,
            description: level.description,
            fidelity: level.fidelity,
            color_tolerance: level.color_tolerance,
        })
        .collect()
}
