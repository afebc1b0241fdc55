//! Console Settings Domain Model
//!
//! Where requests go and which model the templates are seeded with.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::codegen::SnippetTarget;
use crate::error::{DomainError, DomainResult};

/// Default address of a locally running SnapLLM server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:6930";

/// Settings for one console session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value substituted into `model`/`model_id` template fields.
    #[serde(default = "default_model_hint")]
    pub model_hint: String,

    /// Snippet target used when none is given.
    #[serde(default)]
    pub snippet_target: SnippetTarget,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model_hint() -> String {
    "default".to_string()
}

impl ConsoleSettings {
    /// Checks that the base URL is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] otherwise.
    pub fn validate(&self) -> DomainResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{other}': {}",
                self.base_url
            ))),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model_hint: default_model_hint(),
            snippet_target: SnippetTarget::default(),
        }
    }
}
