//! Color composition extraction.
//!
//! Classifies every pixel of a normalized 256x256 copy of the image as warm, cool or
//! neutral by channel dominance, and ranks the exact colors of a 64x64 copy.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::round_to;

/// Side of the square grid used for warm/cool/neutral classification.
pub const ANALYSIS_SIZE: u32 = 256;

/// Side of the square grid used for dominant color counting.
pub const PALETTE_SIZE: u32 = 64;

pub const MAX_DOMINANT_COLORS: usize = 5;

/// A ratio above this marks the composition as warm- or cool-heavy.
pub const HEAVY_THRESHOLD: f64 = 0.4;

/// Warm and cool ratios closer than this are considered balanced.
pub const BALANCED_GAP: f64 = 0.15;

/// Default upper bound on the size of an image file accepted for extraction.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 50 * 1024 * 1024;

const RATIO_DECIMALS: i32 = 3;

// Bicubic, matching the resampling most image toolkits apply by default
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Errors that can occur while extracting a color composition.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image too large: {0} bytes (max: {1})")]
    TooLarge(u64, u64),

    #[error("Image has no pixels")]
    Empty,

    #[error("Color extraction timed out after {0} seconds")]
    TimedOut(u64),

    #[error("Color extraction aborted: {0}")]
    Aborted(String),
}

/// Channel-dominance class of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Warm,
    Cool,
    Neutral,
}

/// Red strictly greatest is warm, blue strictly greatest is cool, anything else
/// (green-dominant or tied) is neutral.
pub fn classify_pixel([r, g, b]: [u8; 3]) -> Tone {
    if r > g && r > b {
        Tone::Warm
    } else if b > g && b > r {
        Tone::Cool
    } else {
        Tone::Neutral
    }
}

/// Warm/cool/neutral fractions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRatios {
    pub warm_ratio: f64,
    pub cool_ratio: f64,
    pub neutral_ratio: f64,
}

impl Default for ColorRatios {
    fn default() -> Self {
        Self {
            warm_ratio: 0.33,
            cool_ratio: 0.33,
            neutral_ratio: 0.34,
        }
    }
}

/// Derived balance flags of a set of ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBalance {
    pub warm_heavy: bool,
    pub cool_heavy: bool,
    pub balanced: bool,
}

impl ColorBalance {
    pub fn from_ratios(warm_ratio: f64, cool_ratio: f64) -> Self {
        Self {
            warm_heavy: warm_ratio > HEAVY_THRESHOLD,
            cool_heavy: cool_ratio > HEAVY_THRESHOLD,
            balanced: (warm_ratio - cool_ratio).abs() < BALANCED_GAP,
        }
    }
}

impl ColorRatios {
    pub fn balance(&self) -> ColorBalance {
        ColorBalance::from_ratios(self.warm_ratio, self.cool_ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub rgb: [u8; 3],
    /// Share of the 64x64 palette sample, rounded to 3 decimals.
    pub percentage: f64,
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorComposition {
    pub warm_ratio: f64,
    pub cool_ratio: f64,
    pub neutral_ratio: f64,
    pub dominant_colors: Vec<DominantColor>,
    pub color_balance: ColorBalance,
}

impl ColorComposition {
    pub fn ratios(&self) -> ColorRatios {
        ColorRatios {
            warm_ratio: self.warm_ratio,
            cool_ratio: self.cool_ratio,
            neutral_ratio: self.neutral_ratio,
        }
    }
}

#[derive(Debug, Default)]
struct ToneCounts {
    warm: usize,
    cool: usize,
    neutral: usize,
}

impl ToneCounts {
    fn tally(image: &RgbImage) -> Self {
        let mut counts = ToneCounts::default();
        for pixel in image.pixels() {
            match classify_pixel(pixel.0) {
                Tone::Warm => counts.warm += 1,
                Tone::Cool => counts.cool += 1,
                Tone::Neutral => counts.neutral += 1,
            }
        }
        counts
    }

    fn total(&self) -> usize {
        self.warm + self.cool + self.neutral
    }
}

/// Read an image file and extract its color composition.
///
/// Files larger than `max_bytes` are rejected before decoding. The format is
/// detected from the file content, not its extension.
pub fn extract_colors(path: &Path, max_bytes: u64) -> Result<ColorComposition, ExtractionError> {
    let io_error = |source| ExtractionError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    if size > max_bytes {
        return Err(ExtractionError::TooLarge(size, max_bytes));
    }

    let bytes = std::fs::read(path).map_err(io_error)?;
    debug!("Extracting colors from {:?} ({} bytes)", path, bytes.len());
    extract_from_bytes(&bytes)
}

/// Decode an in-memory image and extract its color composition.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<ColorComposition, ExtractionError> {
    let image = image::load_from_memory(bytes)?;
    extract_from_image(&image)
}

/// Extract the color composition of an already decoded image.
pub fn extract_from_image(image: &DynamicImage) -> Result<ColorComposition, ExtractionError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExtractionError::Empty);
    }

    let analysis = image::imageops::resize(
        &image.to_rgb8(),
        ANALYSIS_SIZE,
        ANALYSIS_SIZE,
        RESIZE_FILTER,
    );

    let counts = ToneCounts::tally(&analysis);
    let total = counts.total() as f64;
    let warm_ratio = counts.warm as f64 / total;
    let cool_ratio = counts.cool as f64 / total;
    let neutral_ratio = counts.neutral as f64 / total;

    let palette = image::imageops::resize(&analysis, PALETTE_SIZE, PALETTE_SIZE, RESIZE_FILTER);
    let dominant_colors = rank_colors(&palette, MAX_DOMINANT_COLORS);

    Ok(ColorComposition {
        warm_ratio: round_to(warm_ratio, RATIO_DECIMALS),
        cool_ratio: round_to(cool_ratio, RATIO_DECIMALS),
        neutral_ratio: round_to(neutral_ratio, RATIO_DECIMALS),
        dominant_colors,
        // Flags come from the exact ratios, not the rounded ones
        color_balance: ColorBalance::from_ratios(warm_ratio, cool_ratio),
    })
}

/// Count exact colors and return the `limit` most frequent ones.
///
/// Equal counts keep row-major first-appearance order. Shares are rounded to
/// thousandths and never sum past 1.0.
fn rank_colors(image: &RgbImage, limit: usize) -> Vec<DominantColor> {
    let mut counts: HashMap<[u8; 3], (usize, usize)> = HashMap::new();
    for (index, pixel) in image.pixels().enumerate() {
        counts.entry(pixel.0).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<([u8; 3], usize, usize)> = counts
        .into_iter()
        .map(|(rgb, (count, first_seen))| (rgb, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let total = (image.width() as usize * image.height() as usize) as f64;
    let scale = 10f64.powi(RATIO_DECIMALS);
    let mut shares: Vec<([u8; 3], i64)> = ranked
        .into_iter()
        .take(limit)
        .map(|(rgb, count, _)| (rgb, (count as f64 / total * scale).round() as i64))
        .collect();

    // Rounded shares may add up to more than the whole; the excess comes off the tail
    let mut excess = shares.iter().map(|(_, share)| share).sum::<i64>() - scale as i64;
    for (_, share) in shares.iter_mut().rev() {
        if excess <= 0 {
            break;
        }
        let taken = excess.min(*share);
        *share -= taken;
        excess -= taken;
    }

    shares
        .into_iter()
        .map(|(rgb, share)| DominantColor {
            rgb,
            percentage: share as f64 / scale,
        })
        .collect()
}
