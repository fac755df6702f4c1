//! Image codec: the normalization boundary between host representations and
//! raster pixels.
//!
//! Hosts hand us images in three shapes: a raw base64 string, a
//! `data:<mime>;base64,<data>` URL, or already-decoded binary. All three are
//! collapsed into one internal byte sequence here, so nothing downstream
//! branches on representation.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `image::guess_format` (byte signature, never a user hint) |
//! | Decode (PNG, JPEG, WebP) | `image` crate (pure Rust decoders) |
//! | Encode PNG | `image::codecs::png::PngEncoder` (lossless) |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1-100, alpha flattened) |
//! | Encode WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Base64 | `base64` STANDARD engine |
//!
//! Decode and encode are purely functional: no side effects beyond
//! allocation, no state carried between calls.

use crate::error::ProcessingError;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default JPEG quality when the request does not specify one.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// An encoded image as supplied by the host.
///
/// `Text` covers both raw base64 and data URLs; the distinction is resolved
/// during normalization, not stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageInput {
    Text(String),
    Binary(Vec<u8>),
}

impl ImageInput {
    /// Whether this input arrived as a string-encoded image.
    ///
    /// Batch processing requires all items in this representation.
    pub fn is_text(&self) -> bool {
        matches!(self, ImageInput::Text(_))
    }
}

impl From<&str> for ImageInput {
    fn from(s: &str) -> Self {
        ImageInput::Text(s.to_string())
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        ImageInput::Binary(bytes)
    }
}

/// Container format for encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
        };
        write!(f, "{name}")
    }
}

/// Collapse any host representation into one byte sequence.
///
/// Data URLs are stripped to their payload before base64 decoding. Binary
/// input passes through untouched.
pub fn normalize(input: &ImageInput) -> Result<Vec<u8>, ProcessingError> {
    match input {
        ImageInput::Binary(bytes) => Ok(bytes.clone()),
        ImageInput::Text(text) => {
            let payload = if text.starts_with("data:") {
                text.split_once(',')
                    .map(|(_, data)| data)
                    .ok_or_else(|| {
                        ProcessingError::Decode("data URL is missing its payload".to_string())
                    })?
            } else {
                text.as_str()
            };
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| ProcessingError::Decode(format!("invalid base64: {e}")))
        }
    }
}

/// Decode encoded bytes into an RGBA raster image.
///
/// The format is detected from the byte signature alone. Only PNG, JPEG and
/// WebP inputs are accepted; anything else (including formats the signature
/// sniffer recognizes but we do not support) is a [`ProcessingError::Decode`].
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, ProcessingError> {
    if bytes.is_empty() {
        return Err(ProcessingError::Decode("zero-byte image".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ProcessingError::Decode("unrecognized image signature".to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
        return Err(ProcessingError::Decode(format!(
            "unsupported input format: {}",
            format.extensions_str().first().unwrap_or(&"unknown")
        )));
    }

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ProcessingError::Decode(format!("malformed {format:?} payload: {e}")))?;
    Ok(image.to_rgba8())
}

/// Encode a raster image into the requested container format.
///
/// `quality` applies to JPEG only (1 = lowest, 100 = highest) and is ignored
/// for the lossless formats. JPEG cannot carry alpha, so RGBA is flattened by
/// dropping the alpha channel before encoding.
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, ProcessingError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ProcessingError::Encode(format!(
            "{format} cannot represent a {width}x{height} image"
        )));
    }

    let mut buffer = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| ProcessingError::Encode(format!("PNG encoding failed: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_alpha(image);
            JpegEncoder::new_with_quality(&mut buffer, quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| ProcessingError::Encode(format!("JPEG encoding failed: {e}")))?;
        }
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| ProcessingError::Encode(format!("WebP encoding failed: {e}")))?;
        }
    }
    Ok(buffer)
}

fn flatten_alpha(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        image::Rgb([p[0], p[1], p[2]])
    })
}

/// Render encoded bytes as a `data:image/<format>;base64,...` URL.
pub fn to_data_url(bytes: &[u8], format: OutputFormat) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:image/{format};base64,{encoded}")
}

/// Render encoded bytes as raw base64 (no data URL prefix).
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Outcome of a validation-only inspection: dimensions and size without any
/// transform work.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_estimate: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether an input decodes, reporting dimensions and byte size.
///
/// Used by hosts to pre-check inputs before queuing real work. Never fails:
/// a bad input produces `valid: false` with the decode error message.
pub fn inspect(input: &ImageInput) -> InspectionReport {
    let attempt = normalize(input).and_then(|bytes| {
        let image = decode(&bytes)?;
        Ok((image.dimensions(), bytes.len()))
    });
    match attempt {
        Ok(((width, height), size)) => InspectionReport {
            valid: true,
            width: Some(width),
            height: Some(height),
            size_estimate: Some(size),
            error: None,
        },
        Err(e) => InspectionReport {
            valid: false,
            width: None,
            height: None,
            size_estimate: None,
            error: Some(e.to_string()),
        },
    }
}
