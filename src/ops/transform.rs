//! Geometric transforms: crop, resize, rotate, flip.
//!
//! When a descriptor requests several steps they run in a fixed order:
//! crop first (establishes the working region before costly resampling),
//! then resize, then rotate, then flip (both cheap reindexing passes, done
//! last so resampling always sees the pre-rotation orientation).
//!
//! Resampling uses Lanczos3, matching the rest of the `image`-crate stack.
//! The dimension math lives in pure functions so it can be unit tested
//! without touching pixels.

use super::{CropRegion, ResizeSpec, Rotation, TransformSpec};
use crate::error::ProcessingError;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Apply all requested transform steps in the fixed order.
pub fn apply(image: RgbaImage, spec: &TransformSpec) -> Result<RgbaImage, ProcessingError> {
    let mut image = image;

    if let Some(region) = &spec.crop {
        image = crop(image, region)?;
    }
    if let Some(resize) = &spec.resize {
        let (width, height) = resolve_resize_dimensions(image.dimensions(), resize)?;
        if (width, height) != image.dimensions() {
            image = imageops::resize(&image, width, height, FilterType::Lanczos3);
        }
    }
    if let Some(rotation) = spec.rotate {
        image = rotate(image, rotation);
    }
    if spec.flip.horizontal {
        imageops::flip_horizontal_in_place(&mut image);
    }
    if spec.flip.vertical {
        imageops::flip_vertical_in_place(&mut image);
    }

    Ok(image)
}

/// Extract a sub-region. Fails if the region is empty or reaches past the
/// image bounds.
pub fn crop(image: RgbaImage, region: &CropRegion) -> Result<RgbaImage, ProcessingError> {
    let (width, height) = image.dimensions();
    if region.width == 0 || region.height == 0 {
        return Err(ProcessingError::InvalidRegion(
            "crop region must have non-zero width and height".to_string(),
        ));
    }
    let fits_x = region.x.checked_add(region.width).is_some_and(|end| end <= width);
    let fits_y = region.y.checked_add(region.height).is_some_and(|end| end <= height);
    if !fits_x || !fits_y {
        return Err(ProcessingError::InvalidRegion(format!(
            "crop {}x{}+{}+{} exceeds image bounds {}x{}",
            region.width, region.height, region.x, region.y, width, height
        )));
    }
    Ok(imageops::crop_imm(&image, region.x, region.y, region.width, region.height).to_image())
}

/// Resolve a resize request against the source dimensions.
///
/// A missing dimension is derived from the source aspect ratio. With both
/// dimensions given and `keep_aspect_ratio` set, the image is scaled to fit
/// within the box (final dimensions never exceed the request); without it,
/// both dimensions are forced exactly.
///
/// # Examples
/// ```
/// use rastermill::ops::ResizeSpec;
/// use rastermill::ops::transform::resolve_resize_dimensions;
///
/// // 200x200 into a 100x50 box preserving ratio: fits at 50x50.
/// let spec = ResizeSpec { width: Some(100), height: Some(50), keep_aspect_ratio: true };
/// assert_eq!(resolve_resize_dimensions((200, 200), &spec).unwrap(), (50, 50));
/// ```
pub fn resolve_resize_dimensions(
    source: (u32, u32),
    spec: &ResizeSpec,
) -> Result<(u32, u32), ProcessingError> {
    let (src_w, src_h) = source;

    if spec.width == Some(0) || spec.height == Some(0) {
        return Err(ProcessingError::InvalidRegion(
            "resize dimensions must be non-zero".to_string(),
        ));
    }

    match (spec.width, spec.height) {
        (None, None) => Err(ProcessingError::InvalidParameter(
            "resize requires a width or a height".to_string(),
        )),
        (Some(w), None) => {
            let h = (w as f64 * src_h as f64 / src_w as f64).round().max(1.0) as u32;
            Ok((w, h))
        }
        (None, Some(h)) => {
            let w = (h as f64 * src_w as f64 / src_h as f64).round().max(1.0) as u32;
            Ok((w, h))
        }
        (Some(w), Some(h)) => {
            if spec.keep_aspect_ratio {
                let scale = (w as f64 / src_w as f64).min(h as f64 / src_h as f64);
                let out_w = (src_w as f64 * scale).round().max(1.0) as u32;
                let out_h = (src_h as f64 * scale).round().max(1.0) as u32;
                Ok((out_w.min(w), out_h.min(h)))
            } else {
                Ok((w, h))
            }
        }
    }
}

/// Quarter-turn rotation by pixel reindexing. 90 and 270 swap dimensions.
pub fn rotate(image: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Deg90 => imageops::rotate90(&image),
        Rotation::Deg180 => imageops::rotate180(&image),
        Rotation::Deg270 => imageops::rotate270(&image),
    }
}
