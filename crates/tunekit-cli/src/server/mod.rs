//! HTTP API over a curation session.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
