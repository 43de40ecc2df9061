//! Error types for the tunekit library.

use std::path::PathBuf;
use thiserror::Error;

use crate::llm::ServiceError;

/// Main error type for tunekit operations.
#[derive(Debug, Error)]
pub enum TunekitError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external model capability failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A batch run stopped early on a failure that would repeat for every item.
    #[error("Batch aborted after {completed} item(s): {source}")]
    BatchAborted {
        completed: usize,
        #[source]
        source: ServiceError,
    },

    /// Operation attempted on an empty working set.
    #[error("No data: {0}")]
    NoData(String),

    /// A batch run was triggered while another one is still active.
    #[error("A batch run is already in progress")]
    BatchInProgress,

    /// Item id is not part of the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(u64),

    /// Two catalog entries share the same id.
    #[error("Duplicate item id in catalog: {0}")]
    DuplicateItem(u64),

    /// Request is missing required parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TunekitError {
    /// Short remedy shown next to a failed operation.
    pub fn user_hint(&self) -> &'static str {
        match self {
            TunekitError::Service(e) | TunekitError::BatchAborted { source: e, .. } => {
                e.user_hint()
            }
            TunekitError::NoData(_) => "Select items first.",
            TunekitError::BatchInProgress => "Wait for the current run to finish.",
            _ => "Unknown error.",
        }
    }

    /// The underlying service failure, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            TunekitError::Service(e) | TunekitError::BatchAborted { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for tunekit operations.
pub type Result<T> = std::result::Result<T, TunekitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_distinguish_failure_classes() {
        let rate = TunekitError::Service(ServiceError::RateLimited);
        let pay = TunekitError::BatchAborted {
            completed: 2,
            source: ServiceError::PaymentRequired,
        };
        let other = TunekitError::Config("bad".to_string());

        assert!(rate.user_hint().contains("try again later"));
        assert!(pay.user_hint().contains("add credits"));
        assert_eq!(other.user_hint(), "Unknown error.");
    }

    #[test]
    fn test_batch_aborted_display() {
        let err = TunekitError::BatchAborted {
            completed: 3,
            source: ServiceError::RateLimited,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 item(s)"));
        assert!(msg.contains("Rate limit"));
    }
}
