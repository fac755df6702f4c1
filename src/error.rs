//! Error taxonomy for the processing engine.
//!
//! Every failure class the pipeline can produce has its own variant, so
//! callers (and tests) can distinguish a corrupt input from a bad parameter
//! without parsing message strings. At the wire boundary all of these
//! collapse into `{success: false, error: <message>}` via
//! [`ProcessingResult::failure`](crate::request::ProcessingResult::failure);
//! the engine never returns a partially processed image.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Input bytes could not be turned into a raster image: unrecognized
    /// signature, truncated payload, invalid base64, or empty input.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Filter name not present in the filter catalog.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// Effect name not present in the effect catalog.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// Crop or resize parameters outside image bounds or non-positive.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// A descriptor value outside its documented numeric range, a missing
    /// required field, or a field that does not belong to the requested
    /// operation family.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The target format rejected the result (e.g. a zero-sized image).
    #[error("encode failed: {0}")]
    Encode(String),
}
