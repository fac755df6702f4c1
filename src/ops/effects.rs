//! Convolution and per-pixel effects.
//!
//! Two families share one catalog:
//!
//! - **Kernel effects** (edge_detection, emboss, laplace, sobel_horizontal,
//!   sobel_vertical, blur, sharpen): 3x3 convolutions with engine-constant
//!   weights. Borders use clamp-to-edge padding, so output dimensions always
//!   equal input dimensions. RGB channels are convolved; alpha is copied
//!   from the source.
//! - **Per-pixel effects** (threshold, solarize, posterize): pointwise rules
//!   with engine-constant cutoffs.
//!
//! `intensity` is consumed only by `threshold` (it sets the binarization
//! cutoff). Supplying it for any other effect is accepted and ignored; this
//! is a deliberate permissive policy at the request boundary, not an
//! oversight.

use super::luma601;
use crate::error::ProcessingError;
use image::{Rgba, RgbaImage};

/// Luma cutoff above which solarize inverts a pixel's color channels.
const SOLARIZE_CUTOFF: f32 = 128.0;

/// Number of quantization levels per channel for posterize.
const POSTERIZE_LEVELS: u32 = 4;

const EDGE_DETECTION: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
const EMBOSS: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];
const LAPLACE: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];
const SOBEL_HORIZONTAL: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
const SOBEL_VERTICAL: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SHARPEN: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
#[rustfmt::skip]
const GAUSSIAN_BLUR: [f32; 9] = [
    1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0,
    2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0,
    1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0,
];

#[derive(Debug, Clone, Copy)]
enum EffectKind {
    Kernel([f32; 9]),
    Threshold,
    Solarize,
    Posterize,
}

/// Name-to-effect table, the single source of truth for effect names.
const EFFECTS: &[(&str, EffectKind)] = &[
    ("edge_detection", EffectKind::Kernel(EDGE_DETECTION)),
    ("emboss", EffectKind::Kernel(EMBOSS)),
    ("laplace", EffectKind::Kernel(LAPLACE)),
    ("sobel_horizontal", EffectKind::Kernel(SOBEL_HORIZONTAL)),
    ("sobel_vertical", EffectKind::Kernel(SOBEL_VERTICAL)),
    ("blur", EffectKind::Kernel(GAUSSIAN_BLUR)),
    ("sharpen", EffectKind::Kernel(SHARPEN)),
    ("threshold", EffectKind::Threshold),
    ("solarize", EffectKind::Solarize),
    ("posterize", EffectKind::Posterize),
];

/// All supported effect names, in catalog order.
pub fn names() -> Vec<&'static str> {
    EFFECTS.iter().map(|(name, _)| *name).collect()
}

fn lookup(name: &str) -> Option<EffectKind> {
    EFFECTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, kind)| *kind)
}

/// Apply a cataloged effect. Only `threshold` reads `intensity`.
pub fn apply(image: &mut RgbaImage, name: &str, intensity: f32) -> Result<(), ProcessingError> {
    let kind = lookup(name).ok_or_else(|| ProcessingError::UnknownEffect(name.to_string()))?;

    match kind {
        EffectKind::Kernel(kernel) => *image = convolve_3x3(image, &kernel),
        EffectKind::Threshold => threshold(image, intensity),
        EffectKind::Solarize => solarize(image),
        EffectKind::Posterize => posterize(image),
    }
    Ok(())
}

/// 3x3 convolution with clamp-to-edge padding.
fn convolve_3x3(source: &RgbaImage, kernel: &[f32; 9]) -> RgbaImage {
    let (width, height) = source.dimensions();

    RgbaImage::from_fn(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for ky in 0..3i64 {
            for kx in 0..3i64 {
                let weight = kernel[(ky * 3 + kx) as usize];
                // Out-of-bounds neighbors reuse the nearest edge pixel.
                let sx = (x as i64 + kx - 1).clamp(0, width as i64 - 1) as u32;
                let sy = (y as i64 + ky - 1).clamp(0, height as i64 - 1) as u32;
                let p = source.get_pixel(sx, sy);
                for c in 0..3 {
                    acc[c] += weight * p[c] as f32;
                }
            }
        }
        let alpha = source.get_pixel(x, y)[3];
        Rgba([
            acc[0].round().clamp(0.0, 255.0) as u8,
            acc[1].round().clamp(0.0, 255.0) as u8,
            acc[2].round().clamp(0.0, 255.0) as u8,
            alpha,
        ])
    })
}

/// Binarize luminance against a cutoff derived from intensity.
fn threshold(image: &mut RgbaImage, intensity: f32) {
    let cutoff = intensity.clamp(0.0, 1.0) * 255.0;
    for pixel in image.pixels_mut() {
        let l = luma601(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
        let v = if l >= cutoff { 255 } else { 0 };
        pixel[0] = v;
        pixel[1] = v;
        pixel[2] = v;
    }
}

/// Invert the color channels of pixels at or above the luma cutoff.
fn solarize(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let l = luma601(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
        if l >= SOLARIZE_CUTOFF {
            pixel[0] = 255 - pixel[0];
            pixel[1] = 255 - pixel[1];
            pixel[2] = 255 - pixel[2];
        }
    }
}

/// Quantize each channel to a fixed small number of levels.
fn posterize(image: &mut RgbaImage) {
    let steps = (POSTERIZE_LEVELS - 1) as f32;
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            let quantized = (pixel[c] as f32 / 255.0 * steps).round() / steps * 255.0;
            pixel[c] = quantized.round() as u8;
        }
    }
}
