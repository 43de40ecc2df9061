//! Failures reported by the external model capability.

use thiserror::Error;

/// Error returned by a [`CurationProvider`](super::CurationProvider) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// HTTP 429 from the capability.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// HTTP 402 from the capability.
    #[error("Payment required. Please add credits to your workspace.")]
    PaymentRequired,

    /// The request never produced an HTTP response.
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    /// Any other non-success status.
    #[error("Service error ({status}): {message}")]
    Unavailable { status: u16, message: String },

    /// A success status with a payload that does not fit the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => ServiceError::RateLimited,
            402 => ServiceError::PaymentRequired,
            _ => ServiceError::Unavailable {
                status,
                message: truncate(body.trim(), 200),
            },
        }
    }

    /// Whether continuing a batch would only repeat this failure for every
    /// remaining item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::RateLimited | ServiceError::PaymentRequired)
    }

    /// Short remedy for display next to the error.
    pub fn user_hint(&self) -> &'static str {
        match self {
            ServiceError::RateLimited => "Rate limited: try again later.",
            ServiceError::PaymentRequired => "Quota exhausted: add credits to continue.",
            _ => "Unknown error.",
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::from_status(status.as_u16(), &err.to_string())
        } else {
            ServiceError::Unreachable(err.to_string())
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::from_status(429, ""), ServiceError::RateLimited);
        assert_eq!(ServiceError::from_status(402, "x"), ServiceError::PaymentRequired);
        assert_eq!(
            ServiceError::from_status(503, " overloaded \n"),
            ServiceError::Unavailable {
                status: 503,
                message: "overloaded".to_string()
            }
        );
    }

    #[test]
    fn test_only_quota_failures_are_fatal() {
        assert!(ServiceError::RateLimited.is_fatal());
        assert!(ServiceError::PaymentRequired.is_fatal());
        assert!(!ServiceError::Unreachable("dns".into()).is_fatal());
        assert!(!ServiceError::MalformedResponse("{".into()).is_fatal());
        assert!(!ServiceError::from_status(500, "boom").is_fatal());
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "e".repeat(500);
        match ServiceError::from_status(500, &body) {
            ServiceError::Unavailable { message, .. } => {
                assert_eq!(message.len(), 203);
                assert!(message.ends_with("..."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
