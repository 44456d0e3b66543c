//! Whole-workspace reconciliation run

use super::gate::AdmissionGate;
use super::summary::RunSummary;
use crate::access::AccessVerifier;
use crate::catalog::Catalog;
use crate::config::{validate_config_result, RunConfig};
use crate::git::VersionControl;
use crate::reconcile::{ReconciliationOutcome, RepositoryReconciler, RunOptions};
use crate::{ReposyncError, Result};
use chrono::Utc;
use futures::future::join_all;
use std::path::PathBuf;
use tracing::{error, info, instrument};

/// Reconciles every catalog entry into the workspace
///
/// Access is verified once before any repository is touched. Reconciliations
/// then run concurrently, at most `max_parallel` at a time, and one
/// repository's failure never cancels its siblings.
pub struct WorkspaceOrchestrator<V, A> {
    config: RunConfig,
    options: RunOptions,
    catalog: Catalog,
    vcs: V,
    verifier: A,
    /// Working copy the tool was invoked from
    invoking_dir: PathBuf,
}

impl<V, A> WorkspaceOrchestrator<V, A>
where
    V: VersionControl,
    A: AccessVerifier,
{
    /// Create an orchestrator invoked from the process working directory
    pub fn new(config: RunConfig, catalog: Catalog, vcs: V, verifier: A) -> Result<Self> {
        let invoking_dir = std::env::current_dir()?;
        Ok(Self {
            config,
            options: RunOptions::default(),
            catalog,
            vcs,
            verifier,
            invoking_dir,
        })
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_invoking_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.invoking_dir = dir.into();
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Run one full reconciliation pass
    ///
    /// Returns `Err` only for run-level failures: invalid configuration, an
    /// unusable base directory, or failed access verification. Per-repository
    /// failures are reported in the summary.
    #[instrument(skip_all, fields(project = %self.config.project_name))]
    pub async fn run(&self) -> Result<RunSummary> {
        validate_config_result(&self.config)?;

        let started_at = Utc::now();
        let layout = self.config.layout(&self.invoking_dir);
        tokio::fs::create_dir_all(layout.base_dir()).await?;
        info!(base_dir = %layout.base_dir().display(), "Workspace ready");

        if !self.verifier.verify_access().await {
            error!(ssh_target = %self.verifier.target(), "Access verification failed");
            return Err(ReposyncError::AccessDenied(format!(
                "could not authenticate to {}",
                self.verifier.target()
            )));
        }
        info!(ssh_target = %self.verifier.target(), "Access verified");

        let gate = AdmissionGate::new(self.config.max_parallel);
        let reconciler = RepositoryReconciler::new(
            &self.vcs,
            &layout,
            &self.config,
            &self.options,
            &self.invoking_dir,
        );

        let tasks = self.catalog.repositories().iter().map(|repo| {
            let gate = &gate;
            let reconciler = &reconciler;
            async move {
                let _permit = gate.acquire().await?;
                Ok::<ReconciliationOutcome, ReposyncError>(reconciler.reconcile(repo).await)
            }
        });
        let results = join_all(tasks).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut failed_tasks = Vec::new();
        for (repo, result) in self.catalog.repositories().iter().zip(results) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!(repo = %repo.name, error = %e, "Reconciliation did not run");
                    failed_tasks.push(repo.name.clone());
                }
            }
        }

        info!(
            repositories = outcomes.len(),
            admitted = gate.admitted(),
            peak = gate.peak(),
            "Reconciliation pass finished"
        );

        Ok(RunSummary {
            project_name: self.config.project_name.clone(),
            base_dir: layout.base_dir().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            outcomes,
            max_parallel: gate.capacity(),
            peak_concurrency: gate.peak(),
            failed_tasks,
        })
    }
}
