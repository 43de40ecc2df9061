//! Batch cleaning of the selected working set.
//!
//! The [`BatchEngine`] submits items one at a time to the provider's
//! cleaning call, interprets each reply with [`interpret_reply`] and
//! aggregates a [`BatchSummary`].

mod engine;
mod options;
mod progress;
mod result;

pub use engine::BatchEngine;
pub use options::{BatchConfig, CleaningOptions};
pub use progress::Progress;
pub use result::{
    BatchRun, BatchSummary, CHANGE_FAILED, CHANGE_NONE_NEEDED, CHANGE_REFORMATTED,
    DEFAULT_QUALITY, FALLBACK_QUALITY, ProcessedItem, UNCHANGED_QUALITY, average_quality,
    interpret_reply,
};
