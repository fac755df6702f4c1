//! Stylistic filter catalog.
//!
//! Each filter is a pure per-pixel map from an input color to the filter's
//! canonical output; the final pixel is a linear blend between the original
//! and the canonical output, scaled by intensity:
//!
//! ```text
//! result = original + (canonical - original) * intensity
//! ```
//!
//! At intensity 0 every filter is the identity; at 1 the canonical output;
//! above 1 the effect extrapolates past canonical strength, with channels
//! clamped to [0, 255]. All sixteen filters follow this linear policy, none
//! saturates at 1.0.
//!
//! The catalog is a `const` name-to-function table. Lookups fail closed: an
//! unknown name is an error before any pixel work begins, never a fallback
//! to a default filter.

use super::luma601;
use crate::error::ProcessingError;
use image::{Rgba, RgbaImage};

type FilterFn = fn(Rgba<u8>) -> Rgba<u8>;

/// Name-to-transform table. The single source of truth for filter names;
/// host-side menus are populated from this via [`names`].
const FILTERS: &[(&str, FilterFn)] = &[
    ("grayscale", grayscale),
    ("sepia", sepia),
    ("invert", invert),
    ("vintage", vintage),
    ("noir", noir),
    ("warm", warm),
    ("cool", cool),
    ("dramatic", dramatic),
    ("firenze", firenze),
    ("golden", golden),
    ("lix", lix),
    ("lofi", lofi),
    ("neue", neue),
    ("obsidian", obsidian),
    ("pastel_pink", pastel_pink),
    ("ryo", ryo),
];

/// All supported filter names, in catalog order.
pub fn names() -> Vec<&'static str> {
    FILTERS.iter().map(|(name, _)| *name).collect()
}

fn lookup(name: &str) -> Option<FilterFn> {
    FILTERS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, f)| *f)
}

/// Apply a cataloged filter, blended against the original by `intensity`.
pub fn apply(image: &mut RgbaImage, name: &str, intensity: f32) -> Result<(), ProcessingError> {
    let filter = lookup(name).ok_or_else(|| ProcessingError::UnknownFilter(name.to_string()))?;

    for pixel in image.pixels_mut() {
        let canonical = filter(*pixel);
        *pixel = blend(*pixel, canonical, intensity);
    }
    Ok(())
}

/// Linear interpolation (or extrapolation) between original and canonical.
fn blend(original: Rgba<u8>, canonical: Rgba<u8>, intensity: f32) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let o = original[i] as f32;
        let c = canonical[i] as f32;
        *slot = (o + (c - o) * intensity).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

fn clamp255(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn grayscale(p: Rgba<u8>) -> Rgba<u8> {
    let l = clamp255(luma601(p[0] as f32, p[1] as f32, p[2] as f32));
    Rgba([l, l, l, p[3]])
}

fn sepia(p: Rgba<u8>) -> Rgba<u8> {
    let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
    Rgba([
        clamp255(0.393 * r + 0.769 * g + 0.189 * b),
        clamp255(0.349 * r + 0.686 * g + 0.168 * b),
        clamp255(0.272 * r + 0.534 * g + 0.131 * b),
        p[3],
    ])
}

fn invert(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([255 - p[0], 255 - p[1], 255 - p[2], p[3]])
}

/// Sepia tone with lifted blacks and faded contrast.
fn vintage(p: Rgba<u8>) -> Rgba<u8> {
    let toned = sepia(p);
    Rgba([
        clamp255(toned[0] as f32 * 0.88 + 26.0),
        clamp255(toned[1] as f32 * 0.88 + 22.0),
        clamp255(toned[2] as f32 * 0.88 + 18.0),
        p[3],
    ])
}

/// High-contrast monochrome with a slight lift.
fn noir(p: Rgba<u8>) -> Rgba<u8> {
    let l = luma601(p[0] as f32, p[1] as f32, p[2] as f32);
    let v = clamp255((l - 128.0) * 1.3 + 138.0);
    Rgba([v, v, v, p[3]])
}

fn warm(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        clamp255(p[0] as f32 + 24.0),
        p[1],
        clamp255(p[2] as f32 - 18.0),
        p[3],
    ])
}

fn cool(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        clamp255(p[0] as f32 - 18.0),
        p[1],
        clamp255(p[2] as f32 + 24.0),
        p[3],
    ])
}

/// Steep contrast curve around the midpoint.
fn dramatic(p: Rgba<u8>) -> Rgba<u8> {
    let curve = |c: u8| clamp255((c as f32 - 128.0) * 1.45 + 128.0);
    Rgba([curve(p[0]), curve(p[1]), curve(p[2]), p[3]])
}

/// Amber cast with gentle contrast.
fn firenze(p: Rgba<u8>) -> Rgba<u8> {
    let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
    Rgba([
        clamp255((r - 128.0) * 1.1 + 128.0 + 28.0),
        clamp255((g - 128.0) * 1.1 + 128.0 + 8.0),
        clamp255((b - 128.0) * 1.1 + 128.0 - 28.0),
        p[3],
    ])
}

/// Golden-hour grade: boosted reds and greens, suppressed blues.
fn golden(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        clamp255(p[0] as f32 * 1.1 + 16.0),
        clamp255(p[1] as f32 * 1.05 + 8.0),
        clamp255(p[2] as f32 * 0.82),
        p[3],
    ])
}

/// Solarized red channel.
fn lix(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([255 - p[0], p[1], p[2], p[3]])
}

/// Saturation and contrast push.
fn lofi(p: Rgba<u8>) -> Rgba<u8> {
    let l = luma601(p[0] as f32, p[1] as f32, p[2] as f32);
    let punch = |c: u8| {
        let saturated = l + (c as f32 - l) * 1.4;
        clamp255((saturated - 128.0) * 1.15 + 128.0)
    };
    Rgba([punch(p[0]), punch(p[1]), punch(p[2]), p[3]])
}

/// Solarized blue channel.
fn neue(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([p[0], p[1], 255 - p[2], p[3]])
}

/// Dark, cooled-down grade.
fn obsidian(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        clamp255(p[0] as f32 * 0.75),
        clamp255(p[1] as f32 * 0.80),
        clamp255(p[2] as f32 * 0.92 + 10.0),
        p[3],
    ])
}

/// Lightened pink wash.
fn pastel_pink(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        clamp255(p[0] as f32 * 0.90 + 42.0),
        clamp255(p[1] as f32 * 0.84 + 24.0),
        clamp255(p[2] as f32 * 0.88 + 34.0),
        p[3],
    ])
}

/// Solarized red and green channels.
fn ryo(p: Rgba<u8>) -> Rgba<u8> {
    Rgba([255 - p[0], 255 - p[1], p[2], p[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(pixel: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba(pixel))
    }

    #[test]
    fn catalog_has_sixteen_filters() {
        assert_eq!(names().len(), 16);
        assert!(names().contains(&"grayscale"));
        assert!(names().contains(&"ryo"));
    }

    #[test]
    fn unknown_filter_fails_closed() {
        let mut image = solid([10, 20, 30, 255]);
        let result = apply(&mut image, "nonexistent", 1.0);
        assert!(matches!(result, Err(ProcessingError::UnknownFilter(_))));
        // Image untouched on lookup failure.
        assert_eq!(*image.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn zero_intensity_is_identity_for_every_filter() {
        for name in names() {
            let mut image = solid([37, 143, 201, 200]);
            apply(&mut image, name, 0.0).unwrap();
            assert_eq!(
                *image.get_pixel(0, 0),
                Rgba([37, 143, 201, 200]),
                "filter {name} should be identity at intensity 0"
            );
        }
    }

    #[test]
    fn grayscale_of_red_has_equal_channels() {
        let mut image = solid([255, 0, 0, 255]);
        apply(&mut image, "grayscale", 1.0).unwrap();
        let p = image.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[0], 76); // round(0.299 * 255)
        assert_eq!(p[3], 255);
    }

    #[test]
    fn invert_at_full_intensity() {
        let mut image = solid([0, 128, 255, 255]);
        apply(&mut image, "invert", 1.0).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 127, 0, 255]));
    }

    #[test]
    fn half_intensity_blends_halfway() {
        let mut image = solid([100, 100, 100, 255]);
        apply(&mut image, "invert", 0.5).unwrap();
        // Canonical inverse of 100 is 155; halfway back is about 128.
        let p = image.get_pixel(0, 0);
        assert!((p[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn intensity_above_one_extrapolates() {
        let mut image = solid([100, 100, 100, 255]);
        apply(&mut image, "warm", 2.0).unwrap();
        let p = image.get_pixel(0, 0);
        // Canonical shift is +24 red / -18 blue; doubled at intensity 2.
        assert_eq!(p[0], 148);
        assert_eq!(p[2], 64);
    }

    #[test]
    fn extrapolation_clamps_channels() {
        let mut image = solid([250, 250, 5, 255]);
        apply(&mut image, "warm", 2.0).unwrap();
        let p = image.get_pixel(0, 0);
        assert_eq!(p[0], 255);
        assert_eq!(p[2], 0);
    }

    #[test]
    fn filters_preserve_alpha() {
        for name in names() {
            let mut image = solid([90, 60, 30, 128]);
            apply(&mut image, name, 1.0).unwrap();
            assert_eq!(image.get_pixel(0, 0)[3], 128, "filter {name} altered alpha");
        }
    }

    #[test]
    fn ryo_inverts_red_and_green_only() {
        let mut image = solid([10, 20, 30, 255]);
        apply(&mut image, "ryo", 1.0).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([245, 235, 30, 255]));
    }
}
