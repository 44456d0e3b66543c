//! Repository catalog
//!
//! The declarative list of repositories a workspace is made of. Each record
//! is identified by its `name`; every other field (topics, visibility,
//! descriptions, ...) is an opaque payload carried through untouched.
//!
//! A catalog for the gcp-kubernetes project is embedded in the binary and can
//! be replaced by a JSON file at run time.

mod exclusion;

pub use exclusion::ExclusionSet;

use crate::{ReposyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Catalog shipped with the binary
pub const DEFAULT_CATALOG_JSON: &str = include_str!("default_catalog.json");

/// Identity and desired configuration of one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name, unique within a catalog
    pub name: String,

    /// Owner override; `None` (or JSON null) means the run's organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_org: Option<String>,

    /// Everything else in the record, never interpreted
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl RepositoryDescriptor {
    /// Create a descriptor with no extra settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo_org: None,
            settings: serde_json::Map::new(),
        }
    }

    /// Set an owner override
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.repo_org = Some(org.into());
        self
    }

    /// Owner to clone from: the override if present, otherwise `default_org`
    pub fn org_or<'a>(&'a self, default_org: &'a str) -> &'a str {
        match self.repo_org.as_deref() {
            Some(org) if !org.is_empty() => org,
            _ => default_org,
        }
    }
}

/// Ordered, name-unique list of repository descriptors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    repositories: Vec<RepositoryDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate names
    pub fn new(repositories: Vec<RepositoryDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for repo in &repositories {
            if repo.name.trim().is_empty() {
                return Err(ReposyncError::Catalog(
                    "repository name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(ReposyncError::Catalog(format!(
                    "duplicate repository name: {}",
                    repo.name
                )));
            }
        }
        Ok(Self { repositories })
    }

    /// The catalog embedded in the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Parse a JSON array of repository records
    pub fn from_json(json: &str) -> Result<Self> {
        let repositories: Vec<RepositoryDescriptor> = serde_json::from_str(json)?;
        Self::new(repositories)
    }

    /// Load a JSON catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading repository catalog");
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReposyncError::Catalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.repositories
    }

    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryDescriptor> {
        self.repositories.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
