//! Boundary to the hosted language-model capability.
//!
//! Three calls cross this boundary: per-item classification, per-item
//! cleaning during a batch run, and the free-form dataset assistant. All of
//! them go through the [`CurationProvider`] trait and fail with a
//! [`ServiceError`].
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT models or any OpenAI-compatible gateway (requires `OPENAI_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - deterministic, scriptable, no network
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tunekit::{Catalog, CurationSession, OpenAIProvider};
//!
//! let provider = OpenAIProvider::from_env().unwrap();
//! let session = CurationSession::new(Catalog::demo(), Arc::new(provider));
//! session.select(1).unwrap();
//! let classification = session.classify(1).unwrap();
//! println!("{} ({}%)", classification.category, classification.quality_score);
//! ```

mod anthropic;
mod error;
mod mock;
mod openai;
mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use error::ServiceError;
pub use mock::MockProvider;
pub use openai::OpenAIProvider;
pub use provider::{ClassifyRequest, CleanRequest, CurationProvider, LlmConfig};
