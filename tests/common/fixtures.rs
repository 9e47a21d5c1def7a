//! Fixture images written to a temporary directory for each test server.

use super::constants::*;
use anyhow::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use tempfile::TempDir;

fn write_solid_png(dir: &TempDir, name: &str, rgb: [u8; 3]) -> Result<()> {
    let image = RgbImage::from_pixel(FIXTURE_IMAGE_SIZE, FIXTURE_IMAGE_SIZE, Rgb(rgb));
    DynamicImage::ImageRgb8(image).save_with_format(dir.path().join(name), ImageFormat::Png)?;
    Ok(())
}

/// Creates the fixture directory with solid color and corrupt images
pub fn create_test_images() -> Result<TempDir> {
    let dir = TempDir::new()?;

    write_solid_png(&dir, WARM_IMAGE, WARM_RGB)?;
    write_solid_png(&dir, COOL_IMAGE, COOL_RGB)?;
    fs::write(dir.path().join(CORRUPT_IMAGE), b"definitely not a png")?;

    Ok(dir)
}
