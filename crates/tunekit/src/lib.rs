//! Tunekit: curate captured AI artifacts into fine-tuning datasets.
//!
//! Captured code snippets and prompts are selected from a [`Catalog`],
//! enriched with AI-generated classifications, batch-cleaned through a
//! language model and exported as JSONL chat records, Alpaca or ShareGPT.
//!
//! # Core Principles
//!
//! - **One selection**: every downstream step reads the same ordered,
//!   serialized [`SelectionStore`]
//! - **Non-destructive**: captured items are never modified; cleaning
//!   produces separate [`ProcessedItem`]s
//! - **Partial failure**: one failed item never sinks a batch, but rate
//!   limits and exhausted quota stop it at once
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tunekit::{Catalog, CleaningOptions, CurationSession, ExportFormat, MockProvider};
//!
//! let session = CurationSession::new(Catalog::demo(), Arc::new(MockProvider::new()));
//! session.select(1).unwrap();
//! session.select(3).unwrap();
//!
//! let run = session.run_batch(&CleaningOptions::default()).unwrap();
//! println!("Average quality: {}", run.summary.avg_quality_score);
//!
//! let artifact = session.export(ExportFormat::Jsonl, "my-dataset").unwrap();
//! artifact.write_to(".").unwrap();
//! ```

pub mod assistant;
pub mod catalog;
pub mod classification;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod selection;
pub mod stats;

mod session;

pub use assistant::{AssistantAction, ChatMessage, ChatRole, Conversation};
pub use catalog::{Catalog, DataItem, ItemKind};
pub use classification::{Classification, ClassificationStore};
pub use cleaning::{BatchEngine, BatchRun, BatchSummary, CleaningOptions, ProcessedItem, Progress};
pub use config::StudioConfig;
pub use error::{Result, TunekitError};
pub use export::{ExportArtifact, ExportFormat};
pub use llm::{AnthropicProvider, CurationProvider, MockProvider, OpenAIProvider, ServiceError};
pub use selection::SelectionStore;
pub use session::CurationSession;
pub use stats::SelectionStats;
