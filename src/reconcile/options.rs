//! Run-wide intents shared by every reconciliation

use super::request::RemoteIntent;
use crate::catalog::ExclusionSet;

/// Optional global steps for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Commit with this message in every non-excluded repository
    pub commit_message: Option<String>,
    /// Repositories skipped by the remote and commit steps
    pub exclusions: ExclusionSet,
    /// Remote operation to apply in every non-excluded repository
    pub remote: Option<RemoteIntent>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_remote(mut self, remote: RemoteIntent) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn is_excluded(&self, repo_name: &str) -> bool {
        self.exclusions.contains(repo_name)
    }
}
