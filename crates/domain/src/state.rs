//! Failure categories surfaced to the operator.

use serde::{Deserialize, Serialize};

/// How a send attempt (or its response) went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The draft was not valid JSON; nothing was sent and nothing recorded.
    Validation,
    /// No HTTP exchange happened (status 0).
    Transport,
    /// The server answered outside the 2xx range.
    Http,
    /// The response body is not JSON. Not fatal: the raw text is shown.
    Parse,
}

impl FailureKind {
    /// Returns a human-readable title for this failure.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid Request Body",
            Self::Transport => "Connection Failed",
            Self::Http => "HTTP Error",
            Self::Parse => "Non-JSON Response",
        }
    }

    /// Returns user-friendly suggestions for this failure.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::Validation => &[
                "Check that the JSON syntax is valid",
                "Use `format` to locate the error, or `reset` to restore the template",
            ],
            Self::Transport => &[
                "Check if the server is running",
                "Verify the base URL and port are correct",
            ],
            Self::Http => &[
                "Check the error message in the response body",
                "Resolve any {placeholders} left in the path",
            ],
            Self::Parse => &["The raw response text is shown unmodified"],
        }
    }

    /// Returns true if the attempt still produced a history entry.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        !matches!(self, Self::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_failures_skip_history() {
        assert!(!FailureKind::Validation.is_recorded());
        assert!(FailureKind::Transport.is_recorded());
        assert!(FailureKind::Http.is_recorded());
        assert!(FailureKind::Parse.is_recorded());
    }

    #[test]
    fn every_kind_has_guidance() {
        for kind in [
            FailureKind::Validation,
            FailureKind::Transport,
            FailureKind::Http,
            FailureKind::Parse,
        ] {
            assert!(!kind.title().is_empty());
            assert!(!kind.suggestions().is_empty());
        }
    }
}
