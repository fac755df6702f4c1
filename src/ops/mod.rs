//! Pixel operation engines and the vocabulary they share.
//!
//! | Engine | Operation family |
//! |---|---|
//! | [`filters`] | Named stylistic filters with intensity blending |
//! | [`transform`] | Crop, resize, rotate, flip (fixed order) |
//! | [`adjust`] | Brightness, contrast, saturation, hue rotation |
//! | [`effects`] | Kernel convolutions and per-pixel effects |
//!
//! [`Operation`] is the closed sum type the dispatcher matches on. It is
//! produced only by [`crate::request::ProcessRequest::validate`], so by the
//! time an engine sees one, every numeric range and field combination has
//! already been checked. Engines still fail closed on catalog lookups and
//! image-dependent bounds (crop regions, resize targets), since those cannot
//! be checked without the decoded image.

pub mod adjust;
pub mod effects;
pub mod filters;
pub mod transform;

use crate::error::ProcessingError;
use image::RgbaImage;

/// A fully validated operation descriptor. Exactly one family per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Filter { name: String, intensity: f32 },
    Transform(TransformSpec),
    Adjust(AdjustSpec),
    Effect { name: String, intensity: f32 },
}

/// Geometric transform steps. Applied in fixed order:
/// crop, then resize, then rotate, then flip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformSpec {
    pub crop: Option<CropRegion>,
    pub resize: Option<ResizeSpec>,
    pub rotate: Option<Rotation>,
    pub flip: FlipSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resize target. At least one dimension must be set; a missing dimension is
/// derived from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect_ratio: bool,
}

/// Lossless quarter-turn rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipSpec {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Color adjustment parameters. Defaults are the identity, so any subset can
/// be adjusted independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustSpec {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub hue_rotation: f32,
}

impl Default for AdjustSpec {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            hue_rotation: 0.0,
        }
    }
}

/// Route a validated operation to its engine.
///
/// Consumes the image and returns the transformed one; a failed call leaves
/// no partially mutated state behind because the caller's only handle to the
/// pixels was moved in.
pub fn apply(image: RgbaImage, operation: &Operation) -> Result<RgbaImage, ProcessingError> {
    match operation {
        Operation::Filter { name, intensity } => {
            let mut image = image;
            filters::apply(&mut image, name, *intensity)?;
            Ok(image)
        }
        Operation::Transform(spec) => transform::apply(image, spec),
        Operation::Adjust(spec) => {
            let mut image = image;
            adjust::apply(&mut image, spec);
            Ok(image)
        }
        Operation::Effect { name, intensity } => {
            let mut image = image;
            effects::apply(&mut image, name, *intensity)?;
            Ok(image)
        }
    }
}

/// Rec.601 luma of an RGB triple, channels in [0, 255].
pub(crate) fn luma601(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn rotation_from_degrees_accepts_quarter_turns() {
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(180), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::from_degrees(360), None);
    }

    #[test]
    fn adjust_defaults_are_identity() {
        let spec = AdjustSpec::default();
        assert_eq!(spec.brightness, 1.0);
        assert_eq!(spec.contrast, 1.0);
        assert_eq!(spec.saturation, 1.0);
        assert_eq!(spec.hue_rotation, 0.0);
    }

    #[test]
    fn apply_routes_unknown_filter_to_error() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let op = Operation::Filter {
            name: "nonexistent".to_string(),
            intensity: 1.0,
        };
        let result = apply(image, &op);
        assert!(matches!(result, Err(ProcessingError::UnknownFilter(_))));
    }

    #[test]
    fn luma_of_white_is_255() {
        assert!((luma601(255.0, 255.0, 255.0) - 255.0).abs() < 0.01);
    }
}
