//! SnapDeck Application - Use cases and ports
//!
//! This crate contains the console's use cases and the port definitions
//! (traits) that the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod send_request;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, HttpClientError, HttpExchange, HttpFuture};
pub use send_request::{PendingSend, SendOutcome, SendRequest, SendRequestError, prepare_request};
pub use session::{ConsoleSession, ReplayTarget};
