//! Color-to-harmonic vocabulary.
//!
//! Image colors are reduced to warm/cool/neutral ratios ([`color`]), mapped to a harmonic
//! profile ([`harmonic`]) and drawn as an oscilloscope trace ([`render`]). Constraint levels
//! are translated to instructions independently ([`constraint`]), and [`context`] merges
//! everything into the payload handed to the prompt synthesizer.

pub mod color;
pub mod constraint;
pub mod context;
pub mod harmonic;
pub mod render;
pub mod taxonomy;

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Whole percentage of a fraction, truncated toward zero.
pub(crate) fn whole_percent(fraction: f64) -> i64 {
    (fraction * 100.0) as i64
}
