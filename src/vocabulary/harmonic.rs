//! Color ratios to harmonic profile mapping.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::color::{ColorBalance, ColorRatios};
use super::taxonomy::{harmonic_profile, Complexity, ProfileId};

/// A warm or cool ratio above this selects the inharmonic Lissajous profile.
pub const DOMINANT_TONE_THRESHOLD: f64 = 0.45;

/// Caller preference that can override the color-derived profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityPreference {
    Simple,
    #[default]
    Balanced,
    Complex,
}

impl ComplexityPreference {
    /// Parse a preference name. Unrecognized names behave like `balanced`, which
    /// keeps the color-derived profile.
    pub fn from_name(name: &str) -> Self {
        match name {
            "simple" => ComplexityPreference::Simple,
            "balanced" => ComplexityPreference::Balanced,
            "complex" => ComplexityPreference::Complex,
            other => {
                debug!(
                    preference = other,
                    "Unrecognized complexity preference, keeping color-derived profile"
                );
                ComplexityPreference::Balanced
            }
        }
    }

    fn forced_profile(self) -> Option<ProfileId> {
        match self {
            ComplexityPreference::Simple => Some(ProfileId::Simple),
            ComplexityPreference::Complex => Some(ProfileId::Chaotic),
            ComplexityPreference::Balanced => None,
        }
    }
}

/// The profile chosen for a color composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicSelection {
    /// Profile derived from the colors alone.
    pub base_profile: ProfileId,
    /// Profile whose parameters are reported, after the preference override.
    pub selected_profile: ProfileId,
    pub frequencies: &'static [f64],
    pub amplitudes: &'static [f64],
    pub description: &'static str,
    pub complexity: Complexity,
    pub color_mapping: ColorRatios,
}

/// Pick the color-derived profile.
///
/// Balanced compositions get the harmonic series; a dominant warm or cool tone gets
/// the inharmonic Lissajous ratios; everything else falls back to the harmonic series.
pub fn base_profile(ratios: &ColorRatios, balance: &ColorBalance) -> ProfileId {
    if balance.balanced {
        ProfileId::HarmonicRich
    } else if ratios.warm_ratio > DOMINANT_TONE_THRESHOLD
        || ratios.cool_ratio > DOMINANT_TONE_THRESHOLD
    {
        ProfileId::ComplexLissajous
    } else {
        ProfileId::HarmonicRich
    }
}

/// Map color ratios to a harmonic profile.
pub fn map_colors(
    ratios: &ColorRatios,
    balance: &ColorBalance,
    preference: ComplexityPreference,
) -> HarmonicSelection {
    let base = base_profile(ratios, balance);
    let selected = preference.forced_profile().unwrap_or(base);
    let profile = harmonic_profile(selected);

    HarmonicSelection {
        base_profile: base,
        selected_profile: selected,
        frequencies: profile.frequencies,
        amplitudes: profile.amplitudes,
        description: profile.description,
        complexity: profile.complexity,
        color_mapping: *ratios,
    }
}
