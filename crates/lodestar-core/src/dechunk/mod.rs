//! Merge-on-overflow for code chunks and plan steps.
//!
//! Both engines reduce unit count the same way: adjacent units are batched
//! and each batch of more than one unit is replaced by a single synthesized
//! unit that records which originals it absorbed. [`Mergeable`] is the
//! per-payload half of that algorithm; [`chunks`] and [`steps`] hold the
//! grouping rules for each payload.

pub mod chunks;
pub mod steps;

use crate::error::{LodestarError, Result};

pub use chunks::{dechunk_chunks, DechunkOutcome};
pub use steps::{dechunk_steps, StepMergeOutcome};

/// A unit that can be collapsed together with its neighbours.
pub trait Mergeable: Sized {
    /// Noun used in error messages ("chunks", "steps").
    const NOUN: &'static str;

    /// Synthesizes one unit from a batch of at least two.
    fn synthesize(batch: Vec<Self>) -> Self;
}

/// Merges a batch into a single unit.
///
/// A batch of one is returned untouched. An empty batch is a programming
/// error.
pub fn merge_batch<T: Mergeable>(mut batch: Vec<T>) -> Result<T> {
    match batch.len() {
        0 => Err(LodestarError::EmptyMerge { what: T::NOUN }),
        1 => Ok(batch.remove(0)),
        _ => Ok(T::synthesize(batch)),
    }
}

/// Batch size that guarantees at most `cap` batches for `len` items.
///
/// Batches hold `cap` items while that suffices; for very large groups the
/// batch grows so the number of batches still never exceeds `cap`.
pub(crate) fn batch_size(len: usize, cap: usize) -> usize {
    let cap = cap.max(1);
    cap.max(len.div_ceil(cap))
}
