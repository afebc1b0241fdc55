//! JSON helpers shared by the settings loader and the CLI output.

mod json;

pub use json::{SerializationError, from_json, from_json_bytes, to_json_stable};
