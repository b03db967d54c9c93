use crate::models::ValidationResponse;
use std::fmt;

/// Error taxonomy for the publication layer. Validation errors block the
/// operation and are recoverable by correcting input; API errors are caught
/// per-operation and surfaced without retry; a not-found lookup gets its own
/// presentation instead of a generic failure.
#[derive(Debug)]
pub enum PublicationError {
    Validation(String),
    Api(String),
    NotFound(String),
    InvalidTransition(String),
    Internal(String),
}

impl fmt::Display for PublicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PublicationError::Validation(msg) => write!(f, "Validation error: {}", msg),
            PublicationError::Api(msg) => write!(f, "API error: {}", msg),
            PublicationError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PublicationError::InvalidTransition(msg) => {
                write!(f, "Invalid workflow transition: {}", msg)
            }
            PublicationError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PublicationError {}

impl From<Vec<ValidationResponse>> for PublicationError {
    fn from(errors: Vec<ValidationResponse>) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<String>>()
            .join("; ");

        PublicationError::Validation(message)
    }
}

impl PublicationError {
    /// True when the error should be presented as a missing-resource page
    /// rather than a generic failure banner.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PublicationError::NotFound(_))
    }
}
