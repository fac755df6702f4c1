//! # Rastermill
//!
//! A declarative raster image processing engine. Callers hand in an encoded
//! image (base64 string, data URL, or raw bytes) plus a JSON operation
//! descriptor, and get back a re-encoded image with metadata, or a
//! structured error. Built for automation hosts that queue image work and
//! need per-item failure isolation, not for interactive editing.
//!
//! # Architecture: One Pipeline, Four Engines
//!
//! Every call flows through the same pipeline:
//!
//! ```text
//! encoded bytes -> codec.decode -> engine -> codec.encode -> bytes + metadata
//! ```
//!
//! The operation descriptor selects exactly one engine per call: stylistic
//! filters, geometric transforms, color adjustments, or convolution
//! effects. Batch mode wraps the pipeline per item with rayon, isolating
//! each item's failure in its own result slot.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | Input normalization, signature-based decode, PNG/JPEG/WebP encode, inspection |
//! | [`ops`] | The four pixel engines and the validated [`ops::Operation`] vocabulary |
//! | [`request`] | Wire request/response types and validation into the closed sum type |
//! | [`process`] | Single-image dispatch: decode, route, encode, metadata |
//! | [`batch`] | Parallel batch orchestration with per-item isolation and cancellation |
//! | [`error`] | The [`ProcessingError`] taxonomy |
//!
//! # Design Decisions
//!
//! ## Closed Descriptors Over Parameter Bags
//!
//! The wire request is a flat JSON object, but it validates into a closed
//! sum type ([`ops::Operation`]) before any pixel work. Unknown fields are
//! a serde error; fields from the wrong operation family are a validation
//! error. The dispatcher matches exhaustively, so an unmodeled combination
//! cannot fall through to a default.
//!
//! ## Const Catalogs, Fail-Closed Lookups
//!
//! Filter and effect catalogs are `const` name-to-function tables. They are
//! the single source of truth for the names hosts may use ([`filter_names`]
//! and [`effect_names`] expose them for menus), lookups fail closed, and
//! there is no mutable registry to synchronize. Unsynchronized concurrent
//! calls are safe because nothing in the engine is writable between calls.
//!
//! ## Normalization at the Codec Boundary
//!
//! Hosts deliver images three ways: raw base64, data URLs, and binary
//! buffers. All three collapse into one byte sequence inside [`codec`];
//! engines and the dispatcher never branch on representation.
//!
//! ## All-or-Nothing Results
//!
//! A failed call returns `{success: false, error}` with no image payload.
//! Engines consume the decoded image and return a new one, so a mid-stage
//! failure cannot leak a half-transformed buffer. In batch mode this holds
//! per item: item `i` failing never alters item `j`'s slot.

pub mod batch;
pub mod codec;
pub mod error;
pub mod ops;
pub mod process;
pub mod request;

pub use batch::{process_batch, process_batch_with_cancel};
pub use codec::{ImageInput, InspectionReport, OutputFormat, inspect};
pub use error::ProcessingError;
pub use process::process;
pub use request::{
    BatchResult, ImageMetadata, OperationKind, ProcessRequest, ProcessingResult,
};

/// All supported filter names, for host-side selection menus.
pub fn filter_names() -> Vec<&'static str> {
    ops::filters::names()
}

/// All supported effect names, for host-side selection menus.
pub fn effect_names() -> Vec<&'static str> {
    ops::effects::names()
}
