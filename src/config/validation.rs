//! Configuration validation
//!
//! Validates a run configuration before any repository work starts:
//! - The admission gate can admit at least one reconciliation
//! - Host and organization are usable in `git@<host>:<org>/<repo>.git`
//! - Branch names are present

use super::run_config::RunConfig;
use crate::ReposyncError;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a run configuration, collecting every problem
pub fn validate_config(config: &RunConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.max_parallel == 0 {
        errors.push(ValidationError::new(
            "max_parallel",
            "Must be greater than 0",
        ));
    }

    if config.host.trim().is_empty() {
        errors.push(ValidationError::new("host", "Host cannot be empty"));
    } else if config.host.contains("://") || config.host.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(
            "host",
            format!(
                "Invalid host '{}'. Expected a bare hostname such as github.com",
                config.host
            ),
        ));
    }

    if config.org.trim().is_empty() {
        errors.push(ValidationError::new("org", "Organization cannot be empty"));
    }

    for (field, value) in [
        ("default_branch", &config.default_branch),
        ("upstream_branch", &config.upstream_branch),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "Branch name cannot be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and convert to a crate error carrying every message
pub fn validate_config_result(config: &RunConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        ReposyncError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}
