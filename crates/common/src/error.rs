//! Error types shared across Lasso crates.

use std::path::PathBuf;

/// Top-level error type for Lasso operations.
#[derive(Debug, thiserror::Error)]
pub enum LassoError {
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Screenshot portal error: {message}")]
    Portal { message: String },

    #[error("Selection error: {message}")]
    Selection { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Capture cancelled")]
    Cancelled,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using LassoError.
pub type LassoResult<T> = Result<T, LassoError>;

impl LassoError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn portal(msg: impl Into<String>) -> Self {
        Self::Portal {
            message: msg.into(),
        }
    }

    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error means "nothing meaningful was selected" rather
    /// than a capture or I/O problem.
    pub fn is_selection_failure(&self) -> bool {
        matches!(self, Self::Selection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_failures_are_distinguishable() {
        assert!(LassoError::selection("zero area").is_selection_failure());
        assert!(!LassoError::capture("no frames").is_selection_failure());
        assert!(!LassoError::Cancelled.is_selection_failure());
    }

    #[test]
    fn messages_carry_context() {
        let err = LassoError::portal("request denied with status 1");
        assert_eq!(
            err.to_string(),
            "Screenshot portal error: request denied with status 1"
        );
    }
}
