//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapdeck_domain::{ConsoleSettings, EndpointCatalog, EndpointId};

    #[test]
    fn test_stable_serialization_of_catalog_entry() {
        let catalog = EndpointCatalog::builtin();
        let health = catalog.get(EndpointId::Health).expect("health endpoint");

        let json = to_json_stable(health).expect("serialization should work");

        assert!(json.ends_with("}\n"));
        assert!(json.contains("  \"id\": \"health\""));
        assert!(json.contains("  \"method\": \"GET\""));
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: ConsoleSettings =
            from_json(r#"{"model_hint": "phi-3"}"#).expect("deserialization should work");
        assert_eq!(settings.model_hint, "phi-3");
        assert_eq!(settings.base_url, "http://localhost:6930");
    }

    #[test]
    fn test_from_json_bytes_rejects_garbage() {
        let result: Result<ConsoleSettings, _> = from_json_bytes(b"{\"base_url\": ");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
