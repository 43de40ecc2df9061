//! API request handlers.
//!
//! Handlers that reach the language model run the blocking session call on
//! tokio's blocking pool.

mod assistant;
mod batch;
mod catalog;
mod export;
mod selection;

pub use assistant::*;
pub use batch::*;
pub use catalog::*;
pub use export::*;
pub use selection::*;
