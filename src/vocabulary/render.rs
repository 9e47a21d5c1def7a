//! Oscilloscope pattern rendering.
//!
//! Synthesizes a waveform or a Lissajous curve from frequency/amplitude pairs and
//! rasterizes it onto a dark scope-style canvas, returned as a PNG data URI. Output is
//! a pure function of the inputs: the same spec always yields the same bytes.

use std::f64::consts::{FRAC_PI_4, PI};
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::{BitMapBackend, Color, DrawingArea, IntoDrawingArea, PathElement, RGBColor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Waveform synthesis pairs frequencies and amplitudes position by position and
/// ignores the tail of the longer sequence.
// TODO: reject mismatched lengths in `render_scope_pattern` once callers always send
// paired sequences.
pub const ZIP_TRUNCATES_TO_SHORTER: bool = true;

/// Blank band kept above and below (and left/right of, for Lissajous) the trace.
pub const MARGIN: f64 = 20.0;

pub const LISSAJOUS_SAMPLES: usize = 1000;

/// Fixed phase offset of the Lissajous Y driver.
pub const LISSAJOUS_PHASE: f64 = FRAC_PI_4;

const BACKGROUND: Rgb<u8> = Rgb([20, 20, 30]);
const GRID: Rgb<u8> = Rgb([40, 40, 60]);
const AXES: Rgb<u8> = Rgb([100, 100, 120]);
const TRACE_WIDTH: u32 = 2;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Failed to draw pattern: {0}")]
    Draw(String),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Where the axis lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLayout {
    /// Horizontal center line plus the left edge.
    Baseline,
    /// Horizontal and vertical center lines.
    CenterCross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeStyle {
    pub grid_step_x: u32,
    pub grid_step_y: u32,
    pub trace: Rgb<u8>,
    pub axes: AxisLayout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    #[default]
    Waveform,
    Lissajous,
}

impl PatternKind {
    /// `lissajous` selects the Lissajous renderer; every other name draws a waveform.
    pub fn from_name(name: &str) -> Self {
        match name {
            "lissajous" => PatternKind::Lissajous,
            "waveform" => PatternKind::Waveform,
            other => {
                debug!(pattern = other, "Unrecognized pattern type, drawing a waveform");
                PatternKind::Waveform
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Waveform => "waveform",
            PatternKind::Lissajous => "lissajous",
        }
    }

    /// Canvas size used when the caller does not pick one.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            PatternKind::Waveform => (400, 300),
            PatternKind::Lissajous => (400, 400),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PatternKind::Waveform => "Waveform pattern - harmonic series with overtones",
            PatternKind::Lissajous => {
                "Lissajous curve - inharmonic relationships create complex patterns"
            }
        }
    }

    pub fn style(&self) -> ScopeStyle {
        match self {
            PatternKind::Waveform => ScopeStyle {
                grid_step_x: 50,
                grid_step_y: 30,
                trace: Rgb([0, 255, 150]),
                axes: AxisLayout::Baseline,
            },
            PatternKind::Lissajous => ScopeStyle {
                grid_step_x: 50,
                grid_step_y: 50,
                trace: Rgb([255, 100, 200]),
                axes: AxisLayout::CenterCross,
            },
        }
    }
}

/// What to draw. Frequencies and amplitudes need not match a taxonomy profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub kind: PatternKind,
    pub width: u32,
    pub height: u32,
}

impl RenderSpec {
    /// A spec on the pattern's default canvas.
    pub fn new(frequencies: Vec<f64>, amplitudes: Vec<f64>, kind: PatternKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            frequencies,
            amplitudes,
            kind,
            width,
            height,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    /// The base64 PNG payload without the data URI prefix.
    pub fn base64_png(&self) -> &str {
        self.data_uri
            .strip_prefix(DATA_URI_PREFIX)
            .unwrap_or(&self.data_uri)
    }
}

/// Render a pattern to a PNG data URI.
pub fn render(spec: &RenderSpec) -> Result<RenderedImage, RenderError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(RenderError::InvalidDimensions(spec.width, spec.height));
    }

    let style = spec.kind.style();
    let points = match spec.kind {
        PatternKind::Waveform => {
            waveform_points(&spec.frequencies, &spec.amplitudes, spec.width, spec.height)
        }
        PatternKind::Lissajous => {
            lissajous_points(&spec.frequencies, &spec.amplitudes, spec.width, spec.height)
        }
    };
    let image = rasterize(spec.width, spec.height, &style, &points)?;
    let png = encode_png(image)?;
    debug!(
        "Rendered {} {}x{} ({} bytes)",
        spec.kind.as_str(),
        spec.width,
        spec.height,
        png.len()
    );

    Ok(RenderedImage {
        data_uri: format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(png)),
        width: spec.width,
        height: spec.height,
    })
}

/// `count` evenly spaced values over `[start, end]`, both ends included.
fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| start + step * i as f64)
}

/// Map a value in [-1, 1] onto a pixel axis of `extent` pixels, inside the margin.
fn to_pixel(value: f64, extent: u32) -> f64 {
    (value + 1.0) / 2.0 * (extent as f64 - 2.0 * MARGIN) + MARGIN
}

fn waveform_points(
    frequencies: &[f64],
    amplitudes: &[f64],
    width: u32,
    height: u32,
) -> Vec<(f64, f64)> {
    if frequencies.len() != amplitudes.len() {
        debug!(
            frequencies = frequencies.len(),
            amplitudes = amplitudes.len(),
            truncated = ZIP_TRUNCATES_TO_SHORTER,
            "Mismatched frequency/amplitude lengths"
        );
    }

    let mut samples: Vec<f64> = linspace(0.0, 4.0 * PI, width as usize)
        .map(|t| {
            frequencies
                .iter()
                .zip(amplitudes)
                .map(|(freq, amp)| amp * (freq * t).sin())
                .sum()
        })
        .collect();

    // Flat (all-zero) signals are left as is
    let peak = samples.iter().fold(0.0_f64, |peak, v| peak.max(v.abs()));
    if peak > 0.0 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }

    samples
        .into_iter()
        .enumerate()
        .map(|(x, value)| (x as f64, to_pixel(value, height)))
        .collect()
}

fn lissajous_points(
    frequencies: &[f64],
    amplitudes: &[f64],
    width: u32,
    height: u32,
) -> Vec<(f64, f64)> {
    let freq_x = frequencies.first().copied().unwrap_or(1.0);
    let freq_y = frequencies.get(1).copied().unwrap_or(1.0);
    let amp_x = amplitudes.first().copied().unwrap_or(1.0);
    let amp_y = amplitudes.get(1).copied().unwrap_or(1.0);

    linspace(0.0, 2.0 * PI, LISSAJOUS_SAMPLES)
        .map(|t| {
            let x = amp_x * (freq_x * t).sin();
            let y = amp_y * (freq_y * t + LISSAJOUS_PHASE).sin();
            (to_pixel(x, width), to_pixel(y, height))
        })
        .collect()
}

type Scope<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn scope_color(color: Rgb<u8>) -> RGBColor {
    let [r, g, b] = color.0;
    RGBColor(r, g, b)
}

fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Draw grid, trace and axes onto a fresh RGB buffer.
fn rasterize(
    width: u32,
    height: u32,
    style: &ScopeStyle,
    points: &[(f64, f64)],
) -> Result<RgbImage, RenderError> {
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&scope_color(BACKGROUND)).map_err(draw_error)?;

        draw_grid(&root, style.grid_step_x, style.grid_step_y)?;

        let trace = scope_color(style.trace).stroke_width(TRACE_WIDTH);
        for run in trace_runs(points, width, height) {
            root.draw(&PathElement::new(run, trace)).map_err(draw_error)?;
        }

        draw_axes(&root, style.axes)?;
        root.present().map_err(draw_error)?;
    }

    RgbImage::from_raw(width, height, buffer).ok_or(RenderError::InvalidDimensions(width, height))
}

fn draw_segment(
    root: &Scope<'_>,
    from: (i32, i32),
    to: (i32, i32),
    color: Rgb<u8>,
) -> Result<(), RenderError> {
    root.draw(&PathElement::new(vec![from, to], scope_color(color)))
        .map_err(draw_error)
}

fn draw_grid(root: &Scope<'_>, step_x: u32, step_y: u32) -> Result<(), RenderError> {
    let (width, height) = root.dim_in_pixel();
    for x in (0..width).step_by(step_x as usize) {
        draw_segment(root, (x as i32, 0), (x as i32, height as i32), GRID)?;
    }
    for y in (0..height).step_by(step_y as usize) {
        draw_segment(root, (0, y as i32), (width as i32, y as i32), GRID)?;
    }
    Ok(())
}

fn draw_axes(root: &Scope<'_>, layout: AxisLayout) -> Result<(), RenderError> {
    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let (center_x, center_y) = (width / 2, height / 2);

    draw_segment(root, (0, center_y), (width, center_y), AXES)?;
    match layout {
        AxisLayout::Baseline => draw_segment(root, (0, 0), (0, height), AXES),
        AxisLayout::CenterCross => draw_segment(root, (center_x, 0), (center_x, height), AXES),
    }
}

/// Split the trace into runs of pixel coordinates.
///
/// A non-finite sample breaks the line. Points far off the canvas are pinned to a guard
/// band one canvas wide around it, which keeps the rasterizer's work bounded.
fn trace_runs(points: &[(f64, f64)], width: u32, height: u32) -> Vec<Vec<(i32, i32)>> {
    fn pin(value: f64, extent: u32) -> i32 {
        let extent = extent as f64;
        value.clamp(-extent, 2.0 * extent).round() as i32
    }

    let mut runs = Vec::new();
    let mut run: Vec<(i32, i32)> = Vec::new();
    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            if run.len() > 1 {
                runs.push(std::mem::take(&mut run));
            }
            run.clear();
            continue;
        }
        let pixel = (pin(x, width), pin(y, height));
        if run.last() != Some(&pixel) {
            run.push(pixel);
        }
    }
    if run.len() > 1 {
        runs.push(run);
    }
    runs
}

fn encode_png(image: RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image).write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}
