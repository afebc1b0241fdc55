//! Console settings file.
//!
//! Read from the platform-specific config directory:
//! - Linux: ~/.config/snapdeck/settings.json
//! - macOS: ~/Library/Application Support/snapdeck/settings.json
//! - Windows: %APPDATA%/snapdeck/settings.json
//!
//! The console never writes this file.

use std::path::{Path, PathBuf};

use snapdeck_domain::ConsoleSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error while reading the file.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid settings JSON.
    #[error("Invalid settings in {path}: {source}")]
    Serialization {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying error.
        source: SerializationError,
    },
}

/// Loader for `settings.json`.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository for the default settings location.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Creates a repository reading a specific file.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the default settings path, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("snapdeck").join("settings.json"))
    }

    /// The file this repository reads.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads settings.
    ///
    /// Returns defaults when there is no config directory or the file does
    /// not exist. Values are not validated here: command-line and
    /// environment overrides apply first, then the merged result is checked
    /// with [`ConsoleSettings::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub async fn load(&self) -> Result<ConsoleSettings, SettingsError> {
        let Some(path) = &self.path else {
            tracing::debug!("no config directory, using default settings");
            return Ok(ConsoleSettings::default());
        };

        if !fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(ConsoleSettings::default());
        }

        let content = fs::read(path).await.map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        let settings: ConsoleSettings =
            from_json_bytes(&content).map_err(|source| SettingsError::Serialization {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), base_url = %settings.base_url, "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapdeck_domain::SnippetTarget;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = SettingsRepository::with_path(dir.path().join("settings.json"));

        let settings = repo.load().await.unwrap();

        assert_eq!(settings, ConsoleSettings::default());
    }

    #[tokio::test]
    async fn test_loads_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"base_url": "http://gpu-box:6930", "snippet_target": "browser_fetch"}"#,
        )
        .unwrap();

        let settings = SettingsRepository::with_path(&path).load().await.unwrap();

        assert_eq!(settings.base_url, "http://gpu-box:6930");
        assert_eq!(settings.model_hint, "default");
        assert_eq!(settings.snippet_target, SnippetTarget::BrowserFetch);
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_left_for_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"base_url": "ftp://example.com"}"#).unwrap();

        let settings = SettingsRepository::with_path(&path).load().await.unwrap();

        assert_eq!(settings.base_url, "ftp://example.com");
        assert!(settings.validate().is_err());
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{").unwrap();

        let result = SettingsRepository::with_path(&path).load().await;

        assert!(matches!(result, Err(SettingsError::Serialization { .. })));
    }
}
