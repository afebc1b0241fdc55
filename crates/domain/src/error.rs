//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body is not valid JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// No catalog endpoint carries the given identifier.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The category name is not part of the catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The snippet target name is not recognized.
    #[error("unknown snippet target: {0}")]
    UnknownSnippetTarget(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
