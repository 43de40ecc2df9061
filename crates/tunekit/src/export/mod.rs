//! Export of the curated working set as a fine-tuning dataset.
//!
//! Three representations are supported:
//!
//! - **JSONL** chat records, `{"id":"train_<i>","messages":[user, assistant]}`
//!   one per line, with the title as the user turn
//! - **Alpaca** `{instruction, input, output}` records in a JSON array
//! - **ShareGPT** `{id, conversations}` records in a JSON array
//!
//! Cleaned content from a batch run replaces raw content whenever it is
//! non-empty.

mod format;
mod formatter;

pub use format::ExportFormat;
pub use formatter::{ExportArtifact, ExportItem, export, resolve_selection};
