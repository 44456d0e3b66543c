//! Run configuration file handling
//!
//! Loads the optional ~/.config/reposync/config.yaml and resolves the
//! workspace layout.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of reconciliations allowed in flight at once
pub const DEFAULT_MAX_PARALLEL: usize = 5;

fn default_project_name() -> String {
    "gcp-kubernetes".to_string()
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_org() -> String {
    "HappyPathway".to_string()
}

fn default_max_parallel() -> usize {
    DEFAULT_MAX_PARALLEL
}

fn default_branch() -> String {
    "main".to_string()
}

/// Process-wide settings for one reconciliation run
///
/// Fixed at start of run. Every field has a default so an empty YAML file is
/// a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Project the workspace belongs to (display only)
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Git hosting service, used for `git@<host>:<org>/<repo>.git`
    #[serde(default = "default_host")]
    pub host: String,

    /// Organization that owns the managed repositories
    #[serde(default = "default_org")]
    pub org: String,

    /// Directory holding the working copies (default: parent of the
    /// invoking directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Admission gate capacity
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Branch reported when the current branch cannot be determined
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Upstream branch new branches are created from (`origin/<this>`)
    #[serde(default = "default_branch")]
    pub upstream_branch: String,

    /// JSON catalog replacing the embedded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            host: default_host(),
            org: default_org(),
            base_dir: None,
            max_parallel: default_max_parallel(),
            default_branch: default_branch(),
            upstream_branch: default_branch(),
            catalog_path: None,
        }
    }
}

impl RunConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default path if the file exists, otherwise defaults
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::ReposyncError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading reposync configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(
            org = %config.org,
            max_parallel = config.max_parallel,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/reposync/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("reposync");
        path.push("config.yaml");
        path
    }

    /// Set the base directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the admission gate capacity
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    /// Set the owning organization
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    /// Expected origin URL for a repository (`git@<host>:<org>/<repo>.git`)
    pub fn origin_url(&self, org: &str, repo_name: &str) -> String {
        crate::git::origin_url(&self.host, org, repo_name)
    }

    /// Workspace layout rooted at the configured base directory
    ///
    /// Without an explicit base directory the parent of `invoking_dir` is
    /// used; a root directory is its own parent.
    pub fn layout(&self, invoking_dir: &Path) -> WorkspaceLayout {
        let base_dir = match self.base_dir {
            Some(ref dir) => dir.clone(),
            None => invoking_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| invoking_dir.to_path_buf()),
        };
        WorkspaceLayout::new(base_dir)
    }
}

/// Maps repository names to working-copy locations (`<base_dir>/<name>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    base_dir: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Working-copy path for a repository
    pub fn path_for(&self, repo_name: &str) -> PathBuf {
        self.base_dir.join(repo_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.project_name, "gcp-kubernetes");
        assert_eq!(config.host, "github.com");
        assert_eq!(config.org, "HappyPathway");
        assert_eq!(config.max_parallel, 5);
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.upstream_branch, "main");
        assert!(config.base_dir.is_none());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: RunConfig = serde_yaml::from_str("org: acme\nmax_parallel: 2\n").unwrap();
        assert_eq!(config.org, "acme");
        assert_eq!(config.max_parallel, 2);
        assert_eq!(config.host, "github.com");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = RunConfig::new()
            .with_org("acme")
            .with_max_parallel(3)
            .with_base_dir("/srv/work");
        config.save(&path).unwrap();

        let loaded = RunConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RunConfig::load("/nonexistent/reposync/config.yaml");
        assert!(matches!(result, Err(crate::ReposyncError::Config(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(RunConfig::load(&path).unwrap(), RunConfig::default());
    }

    #[test]
    fn test_origin_url() {
        let config = RunConfig::default();
        assert_eq!(
            config.origin_url("HappyPathway", "gcp-deployment"),
            "git@github.com:HappyPathway/gcp-deployment.git"
        );
    }

    #[test]
    fn test_layout_defaults_to_parent_of_invoking_dir() {
        let config = RunConfig::default();
        let layout = config.layout(Path::new("/home/dev/workspace/controller"));
        assert_eq!(layout.base_dir(), Path::new("/home/dev/workspace"));
        assert_eq!(
            layout.path_for("terraform-gcp-storage"),
            PathBuf::from("/home/dev/workspace/terraform-gcp-storage")
        );
    }

    #[test]
    fn test_layout_explicit_base_dir() {
        let config = RunConfig::default().with_base_dir("/srv/repos");
        let layout = config.layout(Path::new("/anywhere"));
        assert_eq!(layout.path_for("a"), PathBuf::from("/srv/repos/a"));
    }

    #[test]
    fn test_layout_root_invoking_dir() {
        let layout = RunConfig::default().layout(Path::new("/"));
        assert_eq!(layout.base_dir(), Path::new("/"));
    }
}
