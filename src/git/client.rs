//! [`VersionControl`] backed by the system git binary

use super::{origin_url, StepResult, VersionControl};
use async_trait::async_trait;
use gitcmd::Git;
use std::path::Path;
use tracing::{debug, warn};

/// Git client that shells out through [`gitcmd`]
#[derive(Debug, Clone)]
pub struct GitClient {
    /// Hosting service used to build clone URLs
    host: String,
    /// Reported when the current branch cannot be read
    default_branch: String,
    /// Start point for branches that do not exist yet (`origin/<this>`)
    upstream_branch: String,
}

impl GitClient {
    pub fn new(
        host: impl Into<String>,
        default_branch: impl Into<String>,
        upstream_branch: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            default_branch: default_branch.into(),
            upstream_branch: upstream_branch.into(),
        }
    }

    /// Build a client from run configuration
    pub fn from_config(config: &crate::config::RunConfig) -> Self {
        Self::new(
            &config.host,
            &config.default_branch,
            &config.upstream_branch,
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether the git binary can be run at all
    pub async fn is_available(&self) -> bool {
        Git::new().is_available().await
    }
}

#[async_trait]
impl VersionControl for GitClient {
    async fn current_branch(&self, path: &Path) -> String {
        match Git::with_workdir(path).current_branch().await {
            Ok(branch) if !branch.is_empty() => branch,
            Ok(_) => self.default_branch.clone(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    default = %self.default_branch,
                    "Could not read current branch, using default"
                );
                self.default_branch.clone()
            }
        }
    }

    async fn checkout_or_create(&self, path: &Path, branch: &str) -> Option<String> {
        let git = Git::with_workdir(path);

        match git.checkout(branch).await {
            Ok(_) => return Some(branch.to_string()),
            Err(e) => debug!(
                path = %path.display(),
                %branch,
                error = %e,
                "Checkout failed, creating branch"
            ),
        }

        let start_point = format!("origin/{}", self.upstream_branch);
        match git.checkout_new_branch(branch, &start_point).await {
            Ok(_) => Some(branch.to_string()),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    %branch,
                    %start_point,
                    error = %e,
                    "Could not check out or create branch"
                );
                None
            }
        }
    }

    async fn clone_into(&self, path: &Path, org: &str, repo_name: &str) -> StepResult {
        let url = origin_url(&self.host, org, repo_name);
        debug!(%url, path = %path.display(), "Cloning");
        Git::new().clone_into(&url, path).await.map(|_| ()).into()
    }

    async fn fetch_and_pull(&self, path: &Path, branch: &str) -> StepResult {
        let git = Git::with_workdir(path);
        if let Err(e) = git.fetch().await {
            return StepResult::failure(e.to_string());
        }
        git.pull("origin", branch).await.map(|_| ()).into()
    }

    async fn remote_url(&self, path: &Path, remote: &str) -> Option<String> {
        match Git::with_workdir(path).remote_get_url(remote).await {
            Ok(url) if !url.is_empty() => Some(url),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %path.display(), %remote, error = %e, "No remote URL");
                None
            }
        }
    }

    async fn add_remote(&self, path: &Path, name: &str, url: &str) -> StepResult {
        Git::with_workdir(path)
            .remote_add(name, url)
            .await
            .map(|_| ())
            .into()
    }

    async fn update_remote(&self, path: &Path, name: &str, url: &str) -> StepResult {
        Git::with_workdir(path)
            .remote_set_url(name, url)
            .await
            .map(|_| ())
            .into()
    }

    async fn remove_remote(&self, path: &Path, name: &str) -> StepResult {
        Git::with_workdir(path)
            .remote_remove(name)
            .await
            .map(|_| ())
            .into()
    }

    async fn stage_all_and_commit(&self, path: &Path, message: &str) -> StepResult {
        let git = Git::with_workdir(path);
        if let Err(e) = git.add_all().await {
            return StepResult::failure(e.to_string());
        }
        git.commit_allow_empty(message).await.map(|_| ()).into()
    }
}
