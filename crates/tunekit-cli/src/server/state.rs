//! Application state for the web server.

use std::sync::Arc;

use tunekit::CurationSession;

/// Shared application state.
///
/// The session synchronizes itself; handlers only clone the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<CurationSession>,
}

impl AppState {
    pub fn new(session: CurationSession) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}
