//! Snippet targets for exporting a composed request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Supported export surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SnippetTarget {
    /// cURL command line
    #[default]
    ShellCurl,
    /// Python with requests library
    ScriptHttpClient,
    /// JavaScript with fetch API
    BrowserFetch,
}

impl SnippetTarget {
    /// Get display name for the target.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::ShellCurl => "cURL",
            Self::ScriptHttpClient => "Python (requests)",
            Self::BrowserFetch => "JavaScript (fetch)",
        }
    }

    /// Short name accepted on the command line.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ShellCurl => "curl",
            Self::ScriptHttpClient => "python",
            Self::BrowserFetch => "fetch",
        }
    }

    /// Get file extension for the target.
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::ShellCurl => "sh",
            Self::ScriptHttpClient => "py",
            Self::BrowserFetch => "js",
        }
    }

    /// Get all available targets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ShellCurl, Self::ScriptHttpClient, Self::BrowserFetch]
    }
}

impl std::fmt::Display for SnippetTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SnippetTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "curl" | "shell" | "sh" => Ok(Self::ShellCurl),
            "python" | "py" | "requests" => Ok(Self::ScriptHttpClient),
            "fetch" | "js" | "javascript" => Ok(Self::BrowserFetch),
            other => Err(DomainError::UnknownSnippetTarget(other.to_string())),
        }
    }
}

/// Generated code snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// The generated code.
    pub code: String,
    /// Target of the generated code.
    pub target: SnippetTarget,
    /// Imports needed before the code runs.
    pub imports: Vec<String>,
}

impl CodeSnippet {
    /// Create a new code snippet.
    #[must_use]
    pub fn new(code: impl Into<String>, target: SnippetTarget) -> Self {
        Self {
            code: code.into(),
            target,
            imports: Vec::new(),
        }
    }

    /// Add an import.
    #[must_use]
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Get the complete code including imports.
    #[must_use]
    pub fn full_code(&self) -> String {
        if self.imports.is_empty() {
            return self.code.clone();
        }
        format!("{}\n\n{}", self.imports.join("\n"), self.code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_target_display() {
        assert_eq!(SnippetTarget::ShellCurl.display_name(), "cURL");
        assert_eq!(SnippetTarget::ScriptHttpClient.file_extension(), "py");
        assert_eq!(SnippetTarget::BrowserFetch.to_string(), "JavaScript (fetch)");
    }

    #[test]
    fn test_target_from_str() {
        for target in SnippetTarget::all() {
            assert_eq!(target.key().parse::<SnippetTarget>().unwrap(), *target);
        }
        assert!("cobol".parse::<SnippetTarget>().is_err());
    }

    #[test]
    fn test_code_snippet_full_code() {
        let snippet = CodeSnippet::new("print('hello')", SnippetTarget::ScriptHttpClient)
            .with_import("import requests");

        assert_eq!(snippet.full_code(), "import requests\n\nprint('hello')");
        assert_eq!(
            CodeSnippet::new("curl x", SnippetTarget::ShellCurl).full_code(),
            "curl x"
        );
    }
}
