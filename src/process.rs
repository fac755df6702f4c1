//! Single-image dispatch: the decode, route, encode pipeline.
//!
//! ```text
//! host input -> normalize -> decode -> validate -> engine -> encode -> result
//! ```
//!
//! Every stage failure short-circuits into a structured
//! `{success: false, error}` result; later stages never run and no partial
//! output escapes. The only side effect is the wall-clock measurement that
//! feeds `processing_time_ms`. Metadata is always derived from the actual
//! encoded output, not from the request.

use crate::codec::{self, DEFAULT_JPEG_QUALITY, ImageInput, OutputFormat};
use crate::error::ProcessingError;
use crate::ops;
use crate::request::{ImageMetadata, ProcessRequest, ProcessingResult};
use std::time::Instant;

/// Process one image according to the request.
pub fn process(input: &ImageInput, request: &ProcessRequest) -> ProcessingResult {
    let started = Instant::now();
    match run_pipeline(input, request) {
        Ok(output) => {
            let elapsed = started.elapsed().as_millis();
            tracing::debug!(
                width = output.width,
                height = output.height,
                format = %request.output_format,
                size_bytes = output.bytes.len(),
                elapsed_ms = elapsed as u64,
                "processed image"
            );
            assemble(output, request, elapsed)
        }
        Err(e) => {
            tracing::debug!(error = %e, "image processing failed");
            ProcessingResult::failure(&e)
        }
    }
}

struct PipelineOutput {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    format: OutputFormat,
}

fn run_pipeline(
    input: &ImageInput,
    request: &ProcessRequest,
) -> Result<PipelineOutput, ProcessingError> {
    let bytes = codec::normalize(input)?;
    let image = codec::decode(&bytes)?;
    let operation = request.validate()?;
    let image = ops::apply(image, &operation)?;

    let (width, height) = image.dimensions();
    let quality = request.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    let encoded = codec::encode(&image, request.output_format, quality)?;

    Ok(PipelineOutput {
        bytes: encoded,
        width,
        height,
        format: request.output_format,
    })
}

fn assemble(output: PipelineOutput, request: &ProcessRequest, elapsed_ms: u128) -> ProcessingResult {
    let metadata = ImageMetadata {
        width: output.width,
        height: output.height,
        format: output.format.to_string(),
        size_bytes: output.bytes.len(),
        processing_time_ms: elapsed_ms,
    };

    let (image_data, binary_data) = if request.output_as_binary {
        (Some(codec::to_base64(&output.bytes)), Some(output.bytes))
    } else {
        (Some(codec::to_data_url(&output.bytes, output.format)), None)
    };

    ProcessingResult {
        success: true,
        image_data,
        binary_data,
        metadata: Some(metadata),
        error: None,
    }
}
