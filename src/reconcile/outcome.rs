//! Per-repository reconciliation results

use super::request::RemoteOperation;
use crate::git::StepResult;
use std::path::PathBuf;
use std::time::Duration;

/// How the working copy was brought up to date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Working copy was absent and a clone was attempted
    Cloned(StepResult),
    /// Working copy existed with the expected origin; fetch+pull attempted
    Updated(StepResult),
    /// Working copy existed but origin did not match; left untouched
    RemoteMismatch {
        expected: String,
        found: Option<String>,
    },
    /// Whether the working copy exists could not be determined; left untouched
    Inaccessible(String),
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        match self {
            SyncOutcome::Cloned(result) | SyncOutcome::Updated(result) => result.ok,
            SyncOutcome::RemoteMismatch { .. } | SyncOutcome::Inaccessible(_) => false,
        }
    }
}

/// Branch checkout result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Not attempted (remote mismatch, inaccessible path or failed clone)
    Skipped,
    CheckedOut(String),
    Failed { branch: String },
}

/// Remote management result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOpOutcome {
    /// No remote operation was requested for this run
    NotRequested,
    /// Requested, but the repository is in the exclusion set
    Excluded,
    /// Requested with missing fields; nothing was executed
    ValidationFailed(String),
    Applied {
        operation: RemoteOperation,
        result: StepResult,
    },
}

impl RemoteOpOutcome {
    pub fn attempted(&self) -> bool {
        matches!(self, RemoteOpOutcome::Applied { .. })
    }
}

/// Commit result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    NotRequested,
    Excluded,
    Committed(StepResult),
}

impl CommitOutcome {
    pub fn attempted(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}

/// Everything that happened to one repository during a run
///
/// Created once by the reconciler and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    pub repo_name: String,
    pub path: PathBuf,
    /// Whether the working copy existed before the run touched it
    pub existed_before: bool,
    /// Branch the controlling workspace was on
    pub target_branch: String,
    pub sync: SyncOutcome,
    pub checkout: CheckoutOutcome,
    pub remote: RemoteOpOutcome,
    pub commit: CommitOutcome,
    pub duration: Duration,
}

impl ReconciliationOutcome {
    /// Whether the clone or fetch+pull succeeded
    pub fn clone_or_update_ok(&self) -> bool {
        self.sync.is_ok()
    }

    pub fn checked_out_branch(&self) -> Option<&str> {
        match self.checkout {
            CheckoutOutcome::CheckedOut(ref branch) => Some(branch),
            _ => None,
        }
    }

    pub fn is_remote_mismatch(&self) -> bool {
        matches!(self.sync, SyncOutcome::RemoteMismatch { .. })
    }

    /// No step reported a failure
    pub fn is_clean(&self) -> bool {
        let remote_ok = match self.remote {
            RemoteOpOutcome::Applied { ref result, .. } => result.ok,
            RemoteOpOutcome::ValidationFailed(_) => false,
            RemoteOpOutcome::NotRequested | RemoteOpOutcome::Excluded => true,
        };
        let commit_ok = match self.commit {
            CommitOutcome::Committed(ref result) => result.ok,
            CommitOutcome::NotRequested | CommitOutcome::Excluded => true,
        };
        self.clone_or_update_ok() && self.checked_out_branch().is_some() && remote_ok && commit_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(sync: SyncOutcome, checkout: CheckoutOutcome) -> ReconciliationOutcome {
        ReconciliationOutcome {
            repo_name: "a".to_string(),
            path: PathBuf::from("/w/a"),
            existed_before: false,
            target_branch: "main".to_string(),
            sync,
            checkout,
            remote: RemoteOpOutcome::NotRequested,
            commit: CommitOutcome::NotRequested,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_clean_outcome() {
        let o = outcome(
            SyncOutcome::Cloned(StepResult::success()),
            CheckoutOutcome::CheckedOut("main".to_string()),
        );
        assert!(o.is_clean());
        assert_eq!(o.checked_out_branch(), Some("main"));
        assert!(!o.is_remote_mismatch());
    }

    #[test]
    fn test_mismatch_is_not_clean() {
        let o = outcome(
            SyncOutcome::RemoteMismatch {
                expected: "git@github.com:o/a.git".to_string(),
                found: None,
            },
            CheckoutOutcome::Skipped,
        );
        assert!(o.is_remote_mismatch());
        assert!(!o.clone_or_update_ok());
        assert!(!o.is_clean());
    }

    #[test]
    fn test_inaccessible_copy_is_not_clean() {
        let o = outcome(
            SyncOutcome::Inaccessible("Not a directory (os error 20)".to_string()),
            CheckoutOutcome::Skipped,
        );
        assert!(!o.clone_or_update_ok());
        assert!(!o.is_remote_mismatch());
        assert!(!o.is_clean());
    }

    #[test]
    fn test_validation_failure_is_not_clean() {
        let mut o = outcome(
            SyncOutcome::Updated(StepResult::success()),
            CheckoutOutcome::CheckedOut("main".to_string()),
        );
        o.remote = RemoteOpOutcome::ValidationFailed("missing url".to_string());
        assert!(!o.remote.attempted());
        assert!(!o.is_clean());
    }

    #[test]
    fn test_excluded_steps_are_clean() {
        let mut o = outcome(
            SyncOutcome::Updated(StepResult::success()),
            CheckoutOutcome::CheckedOut("feature".to_string()),
        );
        o.remote = RemoteOpOutcome::Excluded;
        o.commit = CommitOutcome::Excluded;
        assert!(o.is_clean());
        assert!(!o.commit.attempted());
    }
}
