//! Configuration system
//!
//! Run-wide settings for a reconciliation pass:
//! - Hosting service and owning organization
//! - Workspace base directory and layout
//! - Admission gate capacity
//! - Branch fallbacks

mod run_config;
pub mod validation;

pub use run_config::{RunConfig, WorkspaceLayout, DEFAULT_MAX_PARALLEL};
pub use validation::{validate_config, validate_config_result, ValidationError};
