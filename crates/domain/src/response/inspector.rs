//! Image reference extraction from response bodies.
//!
//! Detection is best-effort. A long identifier made only of base64
//! characters is indistinguishable from raw image bytes under the default
//! rule, so the classification is pluggable through [`ImageClassifier`].

use std::fmt;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
static BASE64_ALPHABET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("valid regex"));

/// Minimum length for an alphabet-only string to be taken as base64 data.
pub const MIN_BASE64_LEN: usize = 80;

/// Turns one candidate string into a displayable image URL.
pub trait ImageClassifier: Send + Sync + fmt::Debug {
    /// Returns the resolved URL, or `None` to drop the candidate.
    fn classify(&self, candidate: &str, base_url: &str) -> Option<String>;
}

/// Default rule: absolute/data URLs as-is, long base64 as PNG, else a path.
///
/// The PNG mime type is assumed, not detected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicImageClassifier;

impl ImageClassifier for HeuristicImageClassifier {
    fn classify(&self, candidate: &str, base_url: &str) -> Option<String> {
        if candidate.is_empty() {
            return None;
        }
        if is_absolute(candidate) {
            return Some(candidate.to_string());
        }
        if candidate.len() >= MIN_BASE64_LEN && BASE64_ALPHABET.is_match(candidate) {
            return Some(format!("data:image/png;base64,{candidate}"));
        }
        Some(resolve_path(candidate, base_url))
    }
}

/// Only produces data URLs for strings that decode to a known image format.
///
/// The mime type comes from the decoded magic bytes. Anything else is
/// treated as a path on the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictImageClassifier;

impl ImageClassifier for StrictImageClassifier {
    fn classify(&self, candidate: &str, base_url: &str) -> Option<String> {
        if candidate.is_empty() {
            return None;
        }
        if is_absolute(candidate) {
            return Some(candidate.to_string());
        }
        if BASE64_ALPHABET.is_match(candidate)
            && let Some(mime) = STANDARD
                .decode(candidate)
                .ok()
                .and_then(|bytes| sniff_image_mime(&bytes))
        {
            return Some(format!("data:{mime};base64,{candidate}"));
        }
        Some(resolve_path(candidate, base_url))
    }
}

/// Extracts image URLs from parsed responses using a pluggable classifier.
#[derive(Debug)]
pub struct ResponseInspector {
    classifier: Box<dyn ImageClassifier>,
}

impl ResponseInspector {
    /// Creates an inspector with the default heuristic.
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(HeuristicImageClassifier)
    }

    /// Creates an inspector with a custom classification rule.
    #[must_use]
    pub fn with_classifier(classifier: impl ImageClassifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Resolves every image candidate of `json` against `base_url`.
    #[must_use]
    pub fn extract_image_urls(&self, json: &Value, base_url: &str) -> Vec<String> {
        image_candidates(json)
            .into_iter()
            .filter_map(|candidate| self.classifier.classify(candidate, base_url))
            .collect()
    }
}

impl Default for ResponseInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts image URLs with the default heuristic.
#[must_use]
pub fn extract_image_urls(json: &Value, base_url: &str) -> Vec<String> {
    ResponseInspector::new().extract_image_urls(json, base_url)
}

/// `images` (string items) wins over `image_url`, which wins over `image`.
fn image_candidates(json: &Value) -> Vec<&str> {
    if let Some(images) = json.get("images").and_then(Value::as_array) {
        return images.iter().filter_map(Value::as_str).collect();
    }
    ["image_url", "image"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .into_iter()
        .collect()
}

fn is_absolute(candidate: &str) -> bool {
    ["http://", "https://", "data:"]
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
}

fn resolve_path(candidate: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if candidate.starts_with('/') {
        format!("{base}{candidate}")
    } else {
        format!("{base}/{candidate}")
    }
}

fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const BASE: &str = "http://x";

    #[test]
    fn long_base64_becomes_png_data_url() {
        let data = "A".repeat(90);
        let urls = extract_image_urls(&json!({ "images": [data] }), BASE);
        assert_eq!(urls, vec![format!("data:image/png;base64,{data}")]);
    }

    #[test]
    fn short_alphabet_strings_are_paths() {
        let urls = extract_image_urls(&json!({ "image": "abc123" }), BASE);
        assert_eq!(urls, vec!["http://x/abc123".to_string()]);
    }

    #[test]
    fn absolute_urls_are_untouched() {
        let urls = extract_image_urls(
            &json!({ "images": ["https://cdn/a.png", "data:image/jpeg;base64,AAAA", "http://h/b"] }),
            BASE,
        );
        assert_eq!(
            urls,
            vec![
                "https://cdn/a.png".to_string(),
                "data:image/jpeg;base64,AAAA".to_string(),
                "http://h/b".to_string(),
            ]
        );
    }

    #[test]
    fn paths_resolve_against_base_url() {
        let urls = extract_image_urls(&json!({ "image_url": "/api/v1/images/out.png" }), BASE);
        assert_eq!(urls, vec!["http://x/api/v1/images/out.png".to_string()]);

        let urls = extract_image_urls(&json!({ "image_url": "out.png" }), "http://x/");
        assert_eq!(urls, vec!["http://x/out.png".to_string()]);
    }

    #[test]
    fn images_array_takes_priority_and_drops_empty_and_non_strings() {
        let urls = extract_image_urls(
            &json!({ "images": ["", 7, "a.png"], "image_url": "/ignored.png" }),
            BASE,
        );
        assert_eq!(urls, vec!["http://x/a.png".to_string()]);
    }

    #[test]
    fn image_url_beats_image() {
        let urls = extract_image_urls(&json!({ "image_url": "/a.png", "image": "/b.png" }), BASE);
        assert_eq!(urls, vec!["http://x/a.png".to_string()]);
    }

    #[test]
    fn no_candidates_yields_nothing() {
        assert!(extract_image_urls(&json!({ "text": "hi" }), BASE).is_empty());
        assert!(extract_image_urls(&json!(["images"]), BASE).is_empty());
    }

    #[test]
    fn strict_classifier_detects_mime_from_bytes() {
        let jpeg = STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        let inspector = ResponseInspector::with_classifier(StrictImageClassifier);
        let urls = inspector.extract_image_urls(&json!({ "image": jpeg }), BASE);
        assert_eq!(urls, vec![format!("data:image/jpeg;base64,{jpeg}")]);
    }

    #[test]
    fn strict_classifier_treats_long_identifiers_as_paths() {
        let id = "A".repeat(90);
        let inspector = ResponseInspector::with_classifier(StrictImageClassifier);
        let urls = inspector.extract_image_urls(&json!({ "image": id }), BASE);
        assert_eq!(urls, vec![format!("http://x/{id}")]);
    }
}
