//! reposync - Multi-repository workspace reconciliation
//!
//! Brings a local workspace of related git repositories into a consistent
//! state: every repository from the catalog cloned or updated, switched to
//! the branch of the controlling working copy, with optional remote
//! management and commits applied across all of them.
//!
//! # Architecture
//!
//! - **catalog**: Repository descriptors and exclusions
//! - **config**: Run configuration, workspace layout, validation
//! - **git**: `VersionControl` seam and the `GitClient` implementation
//! - **access**: One-shot access verification against the hosting service
//! - **reconcile**: Per-repository state machine and its outcomes
//! - **orchestrator**: Bounded fan-out over the catalog and run summary

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod reconcile;
pub mod style;

// Re-exports
pub use error::{ReposyncError, Result};
