//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use snapdeck_domain::request::ComposedRequest;
use thiserror::Error;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, possibly empty.
    pub status_text: String,
    /// Response body decoded as text.
    pub body: String,
}

/// Transport-level failures: no HTTP exchange took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error text.
        message: String,
    },

    /// Nothing is listening on the target port.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The transport's own timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpExchange, HttpClientError>> + Send + 'a>>;

/// Port for dispatching composed requests.
///
/// Implementations make a single attempt, never retry, and attach
/// `Content-Type: application/json` only when a body is present.
pub trait HttpClient: Send + Sync {
    /// Executes the request and returns the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error only when no HTTP exchange happened. Non-2xx
    /// statuses are successful exchanges.
    fn execute(&self, request: &ComposedRequest) -> HttpFuture<'_>;
}
