//! Application error types

use snapdeck_domain::DomainError;
use thiserror::Error;

use crate::send_request::SendRequestError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A send was rejected before dispatch.
    #[error(transparent)]
    Send(#[from] SendRequestError),

    /// The catalog has no endpoint to start the session with.
    #[error("endpoint catalog is empty")]
    EmptyCatalog,

    /// The requested history entry does not exist.
    #[error("no history entry {0}")]
    UnknownHistoryEntry(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
