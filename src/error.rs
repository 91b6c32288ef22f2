//! Error types for the redaction engine.
//!
//! Every fatal condition aborts the run and carries enough context (path,
//! page index or parameter) for the caller to act on it. Page indices are
//! stored 0-based and displayed 1-based.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Caller-supplied input is unusable (no terms, output equals input, ...).
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// The input document cannot be opened or parsed.
    #[error("Cannot read document '{}': {reason}", .path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    /// One page's content cannot be safely rewritten.
    #[error("Page {} content cannot be safely redacted: {reason}", .page + 1)]
    UnsupportedPageContent { page: usize, reason: String },

    /// The destination cannot be written.
    #[error("Cannot write output '{}': {reason}", .path.display())]
    OutputWrite {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A cancellation request was observed before the run completed.
    #[error("Redaction was cancelled before completion")]
    Cancelled,
}

impl RedactorError {
    pub(crate) fn invalid_input(parameter: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_page(page: usize, reason: impl Into<String>) -> Self {
        Self::UnsupportedPageContent {
            page,
            reason: reason.into(),
        }
    }

    /// Returns the offending page index, if the error is tied to one page.
    pub fn page(&self) -> Option<usize> {
        match self {
            Self::UnsupportedPageContent { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Only invalid input can be fixed by the caller and retried as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
