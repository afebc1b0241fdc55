//! SnapDeck Domain - Core console types
//!
//! This crate defines the domain model for the SnapDeck API console.
//! All types here are pure Rust with no I/O dependencies.

pub mod catalog;
pub mod codegen;
pub mod draft;
pub mod error;
pub mod history;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;
pub mod state;
pub mod template;

pub use catalog::{CategoryFilter, Endpoint, EndpointCatalog, EndpointCategory, EndpointId};
pub use codegen::{CodeSnippet, SnippetTarget};
pub use draft::{DraftStore, format_json};
pub use error::{DomainError, DomainResult};
pub use history::{HISTORY_CAPACITY, HistoryEntry, RequestHistory, RequestSnapshot};
pub use id::generate_id;
pub use request::{ComposedRequest, HttpMethod, PlaceholderWarning, RequestComposer};
pub use response::{ResponseInspector, ResponseState};
pub use settings::{ConsoleSettings, DEFAULT_BASE_URL};
pub use state::FailureKind;
pub use template::{build_template, template_text};
