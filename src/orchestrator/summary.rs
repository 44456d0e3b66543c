//! Aggregated results of a run

use crate::reconcile::{
    CheckoutOutcome, CommitOutcome, ReconciliationOutcome, RemoteOpOutcome, SyncOutcome,
};
use crate::style;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Read-only aggregate of every repository outcome in a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub project_name: String,
    /// Directory holding the working copies
    pub base_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// In catalog order
    pub outcomes: Vec<ReconciliationOutcome>,
    pub max_parallel: usize,
    /// Highest number of reconciliations admitted at once
    pub peak_concurrency: usize,
    /// Repositories whose task could not run at all
    pub failed_tasks: Vec<String>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, repo_name: &str) -> Option<&ReconciliationOutcome> {
        self.outcomes.iter().find(|o| o.repo_name == repo_name)
    }

    fn count(&self, predicate: impl Fn(&ReconciliationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }

    pub fn cloned(&self) -> usize {
        self.count(|o| matches!(o.sync, SyncOutcome::Cloned(ref r) if r.ok))
    }

    pub fn clone_failures(&self) -> usize {
        self.count(|o| matches!(o.sync, SyncOutcome::Cloned(ref r) if !r.ok))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o.sync, SyncOutcome::Updated(ref r) if r.ok))
    }

    pub fn update_failures(&self) -> usize {
        self.count(|o| matches!(o.sync, SyncOutcome::Updated(ref r) if !r.ok))
    }

    pub fn remote_mismatches(&self) -> usize {
        self.count(ReconciliationOutcome::is_remote_mismatch)
    }

    pub fn inaccessible(&self) -> usize {
        self.count(|o| matches!(o.sync, SyncOutcome::Inaccessible(_)))
    }

    pub fn checked_out(&self) -> usize {
        self.count(|o| o.checked_out_branch().is_some())
    }

    pub fn checkout_failures(&self) -> usize {
        self.count(|o| matches!(o.checkout, CheckoutOutcome::Failed { .. }))
    }

    pub fn remote_ops_ok(&self) -> usize {
        self.count(|o| {
            matches!(o.remote, RemoteOpOutcome::Applied { ref result, .. } if result.ok)
        })
    }

    pub fn remote_ops_failed(&self) -> usize {
        self.count(|o| {
            matches!(o.remote, RemoteOpOutcome::Applied { ref result, .. } if !result.ok)
        })
    }

    pub fn remote_validation_failures(&self) -> usize {
        self.count(|o| matches!(o.remote, RemoteOpOutcome::ValidationFailed(_)))
    }

    pub fn commits_ok(&self) -> usize {
        self.count(|o| matches!(o.commit, CommitOutcome::Committed(ref r) if r.ok))
    }

    pub fn commits_failed(&self) -> usize {
        self.count(|o| matches!(o.commit, CommitOutcome::Committed(ref r) if !r.ok))
    }

    /// Every repository reconciled without a failed step
    pub fn is_clean(&self) -> bool {
        self.failed_tasks.is_empty() && self.outcomes.iter().all(ReconciliationOutcome::is_clean)
    }

    /// Human-readable report: one line per step per repository, then totals
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        for outcome in &self.outcomes {
            lines.push(String::new());
            lines.push(format!("{}", style::header(&outcome.repo_name)));
            lines.extend(render_outcome(outcome));
        }
        for name in &self.failed_tasks {
            lines.push(format!("{} {}: reconciliation did not run", style::fail_mark(), name));
        }

        lines.push(String::new());
        lines.push(format!("{}", style::header("Summary")));
        lines.push(format!(
            "  Workspace: {}",
            style::path(&self.base_dir.display().to_string())
        ));
        lines.push(format!(
            "  Repositories: {}  (cloned {}, updated {}, remote mismatch {})",
            self.total(),
            self.cloned(),
            self.updated(),
            self.remote_mismatches()
        ));
        if self.inaccessible() > 0 {
            lines.push(format!("  Inaccessible: {}", self.inaccessible()));
        }
        lines.push(format!(
            "  Checkouts: {} ok, {} failed",
            self.checked_out(),
            self.checkout_failures()
        ));
        if self.remote_ops_ok() + self.remote_ops_failed() + self.remote_validation_failures() > 0
        {
            lines.push(format!(
                "  Remote operations: {} ok, {} failed, {} invalid",
                self.remote_ops_ok(),
                self.remote_ops_failed(),
                self.remote_validation_failures()
            ));
        }
        if self.commits_ok() + self.commits_failed() > 0 {
            lines.push(format!(
                "  Commits: {} ok, {} failed",
                self.commits_ok(),
                self.commits_failed()
            ));
        }
        let elapsed = self.finished_at - self.started_at;
        lines.push(format!(
            "  {}",
            style::dim(&format!(
                "{} ms, peak concurrency {}/{}",
                elapsed.num_milliseconds(),
                self.peak_concurrency,
                self.max_parallel
            ))
        ));

        lines.join("\n")
    }
}

fn render_outcome(outcome: &ReconciliationOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    let name = &outcome.repo_name;

    match outcome.sync {
        SyncOutcome::Cloned(ref r) if r.ok => {
            lines.push(format!("  {} {} cloned successfully", style::ok_mark(), name));
        }
        SyncOutcome::Cloned(ref r) => lines.push(failure_line(
            &format!("Failed to clone {}", name),
            r.diagnostic.as_deref(),
        )),
        SyncOutcome::Updated(ref r) if r.ok => {
            lines.push(format!("  {} {} updated successfully", style::ok_mark(), name));
        }
        SyncOutcome::Updated(ref r) => lines.push(failure_line(
            &format!("Failed to update {}", name),
            r.diagnostic.as_deref(),
        )),
        SyncOutcome::RemoteMismatch {
            ref expected,
            ref found,
        } => {
            lines.push(format!("  {} Remote mismatch for {}", style::fail_mark(), name));
            lines.push(format!("    Expected: {}", expected));
            lines.push(format!(
                "    Found:    {}",
                found.as_deref().unwrap_or("<no origin remote>")
            ));
            lines.push(format!(
                "    {}",
                style::warning("Please check the repository manually")
            ));
        }
        SyncOutcome::Inaccessible(ref error) => lines.push(failure_line(
            &format!("Cannot inspect {}", name),
            Some(error),
        )),
    }

    match outcome.checkout {
        CheckoutOutcome::Skipped => {}
        CheckoutOutcome::CheckedOut(ref branch) => lines.push(format!(
            "  {} {} checked out to branch {}",
            style::ok_mark(),
            name,
            style::branch(branch)
        )),
        CheckoutOutcome::Failed { ref branch } => lines.push(failure_line(
            &format!("Failed to checkout branch {} for {}", branch, name),
            None,
        )),
    }

    match outcome.remote {
        RemoteOpOutcome::NotRequested => {}
        RemoteOpOutcome::Excluded => lines.push(format!(
            "  {}",
            style::dim("remote management skipped (excluded)")
        )),
        RemoteOpOutcome::ValidationFailed(ref reason) => lines.push(failure_line(reason, None)),
        RemoteOpOutcome::Applied {
            ref operation,
            ref result,
        } if result.ok => lines.push(format!("  {} {}", style::ok_mark(), operation)),
        RemoteOpOutcome::Applied {
            ref operation,
            ref result,
        } => lines.push(failure_line(
            &format!("Failed to {}", operation),
            result.diagnostic.as_deref(),
        )),
    }

    match outcome.commit {
        CommitOutcome::NotRequested => {}
        CommitOutcome::Excluded => {
            lines.push(format!("  {}", style::dim("commit skipped (excluded)")))
        }
        CommitOutcome::Committed(ref r) if r.ok => {
            lines.push(format!("  {} {} committed successfully", style::ok_mark(), name));
        }
        CommitOutcome::Committed(ref r) => lines.push(failure_line(
            &format!("Failed to commit changes in {}", name),
            r.diagnostic.as_deref(),
        )),
    }

    lines
}

fn failure_line(message: &str, diagnostic: Option<&str>) -> String {
    match diagnostic {
        Some(detail) => format!(
            "  {} {} {}",
            style::fail_mark(),
            message,
            style::dim(&format!("({})", detail))
        ),
        None => format!("  {} {}", style::fail_mark(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StepResult;
    use crate::reconcile::RemoteOperation;
    use std::path::PathBuf;
    use std::time::Duration;

    fn outcome(name: &str, sync: SyncOutcome, checkout: CheckoutOutcome) -> ReconciliationOutcome {
        ReconciliationOutcome {
            repo_name: name.to_string(),
            path: PathBuf::from("/w").join(name),
            existed_before: matches!(sync, SyncOutcome::Updated(_)),
            target_branch: "main".to_string(),
            sync,
            checkout,
            remote: RemoteOpOutcome::NotRequested,
            commit: CommitOutcome::NotRequested,
            duration: Duration::from_millis(10),
        }
    }

    fn summary(outcomes: Vec<ReconciliationOutcome>) -> RunSummary {
        let now = Utc::now();
        RunSummary {
            project_name: "gcp-kubernetes".to_string(),
            base_dir: PathBuf::from("/srv/gcp-kubernetes"),
            started_at: now,
            finished_at: now,
            outcomes,
            max_parallel: 5,
            peak_concurrency: 2,
            failed_tasks: Vec::new(),
        }
    }

    #[test]
    fn test_counts() {
        let mut committed = outcome(
            "c",
            SyncOutcome::Cloned(StepResult::failure("denied")),
            CheckoutOutcome::Skipped,
        );
        committed.commit = CommitOutcome::Committed(StepResult::success());
        committed.remote = RemoteOpOutcome::Applied {
            operation: RemoteOperation::Delete {
                name: "mirror".to_string(),
            },
            result: StepResult::failure("No such remote"),
        };

        let s = summary(vec![
            outcome(
                "a",
                SyncOutcome::Cloned(StepResult::success()),
                CheckoutOutcome::CheckedOut("main".to_string()),
            ),
            outcome(
                "b",
                SyncOutcome::Updated(StepResult::success()),
                CheckoutOutcome::Failed {
                    branch: "main".to_string(),
                },
            ),
            committed,
        ]);

        assert_eq!(s.total(), 3);
        assert_eq!(s.cloned(), 1);
        assert_eq!(s.clone_failures(), 1);
        assert_eq!(s.updated(), 1);
        assert_eq!(s.checked_out(), 1);
        assert_eq!(s.checkout_failures(), 1);
        assert_eq!(s.remote_ops_failed(), 1);
        assert_eq!(s.commits_ok(), 1);
        assert!(!s.is_clean());
        assert!(s.outcome("b").is_some());
    }

    #[test]
    fn test_render_lists_every_step() {
        let mut s = summary(vec![
            outcome(
                "terraform-gcp-compute",
                SyncOutcome::Cloned(StepResult::success()),
                CheckoutOutcome::CheckedOut("feature/net".to_string()),
            ),
            outcome(
                "gcp-deployment",
                SyncOutcome::RemoteMismatch {
                    expected: "git@github.com:HappyPathway/gcp-deployment.git".to_string(),
                    found: None,
                },
                CheckoutOutcome::Skipped,
            ),
        ]);
        s.outcomes[0].commit = CommitOutcome::Committed(StepResult::success());

        let report = s.render();
        assert!(report.contains("terraform-gcp-compute cloned successfully"));
        assert!(report.contains("checked out to branch"));
        assert!(report.contains("terraform-gcp-compute committed successfully"));
        assert!(report.contains("Remote mismatch for gcp-deployment"));
        assert!(report.contains("git@github.com:HappyPathway/gcp-deployment.git"));
        assert!(report.contains("Commits: 1 ok, 0 failed"));
        assert!(report.contains("Workspace: "));
        assert!(report.contains("/srv/gcp-kubernetes"));
        assert!(!report.contains("Remote operations:"));
        assert!(!report.contains("Inaccessible:"));
    }

    #[test]
    fn test_render_reports_inaccessible_copy() {
        let s = summary(vec![outcome(
            "infra",
            SyncOutcome::Inaccessible("Not a directory (os error 20)".to_string()),
            CheckoutOutcome::Skipped,
        )]);

        assert_eq!(s.inaccessible(), 1);
        assert!(!s.is_clean());
        let report = s.render();
        assert!(report.contains("Cannot inspect infra"));
        assert!(report.contains("Not a directory"));
        assert!(report.contains("Inaccessible: 1"));
    }

    #[test]
    fn test_empty_summary_is_clean() {
        let s = summary(Vec::new());
        assert!(s.is_clean());
        assert!(s.render().contains("Repositories: 0"));
    }
}
