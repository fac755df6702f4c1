//! Batch orchestration with per-item failure isolation.
//!
//! Each item runs through the single-image pipeline independently; one
//! item's failure lands in its own result slot and never disturbs a
//! sibling. Items are processed in parallel on the rayon pool, but the
//! output `results` always mirror input order: the parallel map gathers by
//! index, not by completion time.
//!
//! Batch inputs must be homogeneous: every item a string-encoded image
//! (raw base64 or data URL). A batch containing binary items is rejected
//! before any item is processed.
//!
//! Cancellation is cooperative. The flag is checked once before an item
//! starts; items already in flight run to completion, so no partially
//! processed pixel buffer is ever observable.

use crate::codec::ImageInput;
use crate::error::ProcessingError;
use crate::process;
use crate::request::{BatchResult, ProcessRequest, ProcessingResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Process a batch of images with the same request.
pub fn process_batch(
    inputs: &[ImageInput],
    request: &ProcessRequest,
) -> Result<BatchResult, ProcessingError> {
    let never = AtomicBool::new(false);
    process_batch_with_cancel(inputs, request, &never)
}

/// Process a batch, skipping items that have not started when `cancel` is
/// set. Skipped items report a failure result in their slot.
pub fn process_batch_with_cancel(
    inputs: &[ImageInput],
    request: &ProcessRequest,
    cancel: &AtomicBool,
) -> Result<BatchResult, ProcessingError> {
    if let Some(position) = inputs.iter().position(|input| !input.is_text()) {
        return Err(ProcessingError::InvalidParameter(format!(
            "batch inputs must all be string-encoded images, item {position} is binary"
        )));
    }

    let started = Instant::now();
    let results: Vec<ProcessingResult> = inputs
        .par_iter()
        .map(|input| {
            if cancel.load(Ordering::SeqCst) {
                ProcessingResult::failure_message(
                    "batch cancelled before this item started".to_string(),
                )
            } else {
                process::process(input, request)
            }
        })
        .collect();

    let successful = results.iter().filter(|r| r.success).count();
    let batch = BatchResult {
        processed: results.len(),
        successful,
        failed: results.len() - successful,
        results,
        total_time_ms: started.elapsed().as_millis(),
    };
    tracing::debug!(
        processed = batch.processed,
        successful = batch.successful,
        failed = batch.failed,
        total_ms = batch.total_time_ms as u64,
        "batch complete"
    );
    Ok(batch)
}
