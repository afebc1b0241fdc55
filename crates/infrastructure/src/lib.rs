//! SnapDeck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus snippet generation and
//! settings loading.

pub mod adapters;
pub mod codegen;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use codegen::{CodeGenerator, generate_snippet};
pub use persistence::{SettingsError, SettingsRepository};
pub use serialization::{SerializationError, from_json, from_json_bytes, to_json_stable};
