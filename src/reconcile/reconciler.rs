//! Per-repository reconciliation state machine
//!
//! `Start → Exists? → {VerifyRemote → Update | Clone} → Checkout →
//! [RemoteOp] → [Commit] → Done`
//!
//! Steps run strictly in order. A failing step is recorded and the sequence
//! continues; the remote and commit steps run against whatever working copy
//! state exists.

use super::options::RunOptions;
use super::outcome::{
    CheckoutOutcome, CommitOutcome, ReconciliationOutcome, RemoteOpOutcome, SyncOutcome,
};
use super::request::RemoteOperation;
use crate::catalog::RepositoryDescriptor;
use crate::config::{RunConfig, WorkspaceLayout};
use crate::git::{StepResult, VersionControl};
use crate::metrics;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Drives one repository through the reconciliation steps
pub struct RepositoryReconciler<'a> {
    vcs: &'a dyn VersionControl,
    layout: &'a WorkspaceLayout,
    config: &'a RunConfig,
    options: &'a RunOptions,
    /// Working copy of the controlling workspace; its branch is propagated
    control_dir: &'a Path,
}

impl<'a> RepositoryReconciler<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        layout: &'a WorkspaceLayout,
        config: &'a RunConfig,
        options: &'a RunOptions,
        control_dir: &'a Path,
    ) -> Self {
        Self {
            vcs,
            layout,
            config,
            options,
            control_dir,
        }
    }

    /// Reconcile one repository; never fails, every step is recorded
    #[instrument(skip_all, fields(repo = %repo.name))]
    pub async fn reconcile(&self, repo: &RepositoryDescriptor) -> ReconciliationOutcome {
        let started = Instant::now();
        let path = self.layout.path_for(&repo.name);
        let org = repo.org_or(&self.config.org);

        // Every managed repository follows the controller's branch
        let target_branch = self.vcs.current_branch(self.control_dir).await;
        let (existed_before, sync, checkout) = match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                let (sync, checkout) = self
                    .update_existing(&path, org, &repo.name, &target_branch)
                    .await;
                (true, sync, checkout)
            }
            Ok(false) => {
                let (sync, checkout) = self
                    .clone_missing(&path, org, &repo.name, &target_branch)
                    .await;
                (false, sync, checkout)
            }
            Err(e) => {
                // Unknown state: neither clone nor update
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Cannot inspect working copy, skipping update and checkout"
                );
                metrics::record_step("inspect", false);
                (
                    false,
                    SyncOutcome::Inaccessible(e.to_string()),
                    CheckoutOutcome::Skipped,
                )
            }
        };

        let remote = self.manage_remote(&path, &repo.name).await;
        let commit = self.commit(&path, &repo.name).await;

        let duration = started.elapsed();
        metrics::observe_reconcile_duration(duration.as_secs_f64());

        ReconciliationOutcome {
            repo_name: repo.name.clone(),
            path,
            existed_before,
            target_branch,
            sync,
            checkout,
            remote,
            commit,
            duration,
        }
    }

    async fn update_existing(
        &self,
        path: &Path,
        org: &str,
        repo_name: &str,
        target_branch: &str,
    ) -> (SyncOutcome, CheckoutOutcome) {
        let expected = self.config.origin_url(org, repo_name);
        let found = self.vcs.remote_url(path, "origin").await;

        if found.as_deref() != Some(expected.as_str()) {
            // Left alone: the clone may have been repointed by hand
            warn!(
                path = %path.display(),
                %expected,
                found = found.as_deref().unwrap_or("<none>"),
                "Remote mismatch, skipping update and checkout"
            );
            metrics::record_step("verify_remote", false);
            return (
                SyncOutcome::RemoteMismatch { expected, found },
                CheckoutOutcome::Skipped,
            );
        }

        let current = self.vcs.current_branch(path).await;
        let update = self.vcs.fetch_and_pull(path, &current).await;
        log_step("update", &update);

        let checkout = self.checkout(path, target_branch).await;
        (SyncOutcome::Updated(update), checkout)
    }

    async fn clone_missing(
        &self,
        path: &Path,
        org: &str,
        repo_name: &str,
        target_branch: &str,
    ) -> (SyncOutcome, CheckoutOutcome) {
        let clone = self.vcs.clone_into(path, org, repo_name).await;
        log_step("clone", &clone);

        let checkout = if clone.ok {
            self.checkout(path, target_branch).await
        } else {
            CheckoutOutcome::Skipped
        };
        (SyncOutcome::Cloned(clone), checkout)
    }

    async fn checkout(&self, path: &Path, branch: &str) -> CheckoutOutcome {
        match self.vcs.checkout_or_create(path, branch).await {
            Some(checked_out) => {
                info!(branch = %checked_out, "Checked out branch");
                metrics::record_step("checkout", true);
                CheckoutOutcome::CheckedOut(checked_out)
            }
            None => {
                warn!(%branch, "Checkout failed");
                metrics::record_step("checkout", false);
                CheckoutOutcome::Failed {
                    branch: branch.to_string(),
                }
            }
        }
    }

    async fn manage_remote(&self, path: &Path, repo_name: &str) -> RemoteOpOutcome {
        let Some(ref intent) = self.options.remote else {
            return RemoteOpOutcome::NotRequested;
        };
        if self.options.is_excluded(repo_name) {
            info!("Excluded from remote management");
            return RemoteOpOutcome::Excluded;
        }

        let request = intent.request_for(repo_name);
        let kind = request.kind();
        let operation = match request.validate() {
            Ok(operation) => operation,
            Err(reason) => {
                warn!(%kind, %reason, "Remote operation not attempted");
                metrics::record_step("remote", false);
                return RemoteOpOutcome::ValidationFailed(reason);
            }
        };

        info!(kind = %operation.kind(), remote = operation.name(), "Applying remote operation");
        let result = match operation {
            RemoteOperation::Add { ref name, ref url } => {
                self.vcs.add_remote(path, name, url).await
            }
            RemoteOperation::Update { ref name, ref url } => {
                self.vcs.update_remote(path, name, url).await
            }
            RemoteOperation::Delete { ref name } => self.vcs.remove_remote(path, name).await,
        };
        log_step("remote", &result);

        RemoteOpOutcome::Applied { operation, result }
    }

    async fn commit(&self, path: &Path, repo_name: &str) -> CommitOutcome {
        let Some(ref message) = self.options.commit_message else {
            return CommitOutcome::NotRequested;
        };
        if self.options.is_excluded(repo_name) {
            info!("Excluded from commit");
            return CommitOutcome::Excluded;
        }

        let result = self.vcs.stage_all_and_commit(path, message).await;
        log_step("commit", &result);
        CommitOutcome::Committed(result)
    }
}

fn log_step(step: &str, result: &StepResult) {
    metrics::record_step(step, result.ok);
    if result.ok {
        info!(step, "Step succeeded");
    } else {
        warn!(
            step,
            diagnostic = result.diagnostic.as_deref().unwrap_or("unknown error"),
            "Step failed"
        );
    }
}
