//! Error types for reposync
//!
//! Run-level failures only. Individual git steps never produce these; they
//! are folded into per-repository results (see [`crate::git::StepResult`]).

use thiserror::Error;

/// Result type alias for reposync operations
pub type Result<T> = std::result::Result<T, ReposyncError>;

/// Error type for run-level reposync failures
#[derive(Error, Debug)]
pub enum ReposyncError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Repository catalog errors (malformed records, duplicate names)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Access verification against the hosting service failed
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Errors from the git/ssh command wrapper
    #[error("Command error: {0}")]
    Command(#[from] gitcmd::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Errors wrapped with context by the binary (config and catalog loading)
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

impl ReposyncError {
    /// Whether this error is the fatal access precondition
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ReposyncError::AccessDenied(_))
    }
}
