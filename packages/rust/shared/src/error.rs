//! Error types for docsite.
//!
//! Library crates use [`DocsiteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docsite operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsiteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An external program (git, the site builder) failed to run or exited non-zero.
    #[error("command `{program} {args}` failed (exit code {code:?}): {stderr}")]
    Command {
        program: String,
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A source document has no Markdown heading to derive its title from.
    #[error("no heading found in {path}; every document must start with a heading")]
    MissingHeading { path: String },

    /// Data validation error (bad paths, invalid input, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// One or more tasks of a parallel fan-out failed.
    #[error("{stage}: {} task(s) failed:\n{}", .failures.len(), .failures.join("\n"))]
    Aggregate {
        stage: String,
        failures: Vec<String>,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsiteError>;

impl DocsiteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocsiteError::config("cutoff must be at least 1");
        assert_eq!(err.to_string(), "config error: cutoff must be at least 1");

        let err = DocsiteError::MissingHeading {
            path: "user-guide/index.md".into(),
        };
        assert!(err.to_string().contains("user-guide/index.md"));
    }

    #[test]
    fn aggregate_lists_every_failure() {
        let err = DocsiteError::Aggregate {
            stage: "write documents".into(),
            failures: vec!["a.md: boom".into(), "b.md: bang".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("write documents: 2 task(s) failed"));
        assert!(msg.contains("a.md: boom"));
        assert!(msg.contains("b.md: bang"));
    }

    #[test]
    fn command_error_carries_exit_code() {
        let err = DocsiteError::Command {
            program: "git".into(),
            args: "checkout v9.9.9".into(),
            code: Some(1),
            stderr: "pathspec did not match".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git checkout v9.9.9"));
        assert!(msg.contains("Some(1)"));
    }
}
