//! Version-control operations against local working copies
//!
//! [`VersionControl`] is the seam between reconciliation logic and the git
//! binary. Every operation is fail-soft: errors are folded into a
//! [`StepResult`] or an `Option` and never propagate, so one failing step
//! cannot abort the rest of a repository's sequence.

mod client;

pub use client::GitClient;

use async_trait::async_trait;
use std::path::Path;

/// SSH clone URL (`git@<host>:<org>/<repo>.git`)
pub fn origin_url(host: &str, org: &str, repo_name: &str) -> String {
    format!("git@{}:{}/{}.git", host, org, repo_name)
}

/// Outcome of one fail-soft git step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub ok: bool,
    /// What went wrong, when known
    pub diagnostic: Option<String>,
}

impl StepResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            diagnostic: None,
        }
    }

    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            ok: false,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl<E: std::fmt::Display> From<std::result::Result<(), E>> for StepResult {
    fn from(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Operation set against one local working copy
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Branch checked out at `path`, or the configured default on any error
    async fn current_branch(&self, path: &Path) -> String;

    /// Check out `branch`, creating it from the upstream default branch if
    /// the checkout fails. `None` when both attempts fail.
    async fn checkout_or_create(&self, path: &Path, branch: &str) -> Option<String>;

    /// Clone `<org>/<repo_name>` into `path`
    async fn clone_into(&self, path: &Path, org: &str, repo_name: &str) -> StepResult;

    /// Fetch remote state, then pull `branch` from origin
    async fn fetch_and_pull(&self, path: &Path, branch: &str) -> StepResult;

    /// URL configured for `remote`, `None` if absent or unreadable
    async fn remote_url(&self, path: &Path, remote: &str) -> Option<String>;

    async fn add_remote(&self, path: &Path, name: &str, url: &str) -> StepResult;

    async fn update_remote(&self, path: &Path, name: &str, url: &str) -> StepResult;

    async fn remove_remote(&self, path: &Path, name: &str) -> StepResult;

    /// Stage the full working tree and commit; empty commits are allowed
    async fn stage_all_and_commit(&self, path: &Path, message: &str) -> StepResult;
}
