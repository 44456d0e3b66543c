//! Remote management requests
//!
//! A run carries at most one [`RemoteIntent`]: the operation selected on the
//! command line plus a remote name and base URL. For each repository it is
//! turned into a [`RemoteOperationRequest`] whose URL is the base URL with the
//! repository name appended verbatim. Validation then yields the
//! [`RemoteOperation`] to execute, or the reason it cannot run.

use crate::ReposyncError;
use std::fmt;
use std::str::FromStr;

/// Remote operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperationKind {
    Add,
    Update,
    Delete,
}

impl fmt::Display for RemoteOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperationKind::Add => write!(f, "add"),
            RemoteOperationKind::Update => write!(f, "update"),
            RemoteOperationKind::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for RemoteOperationKind {
    type Err = ReposyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(RemoteOperationKind::Add),
            "update" => Ok(RemoteOperationKind::Update),
            "delete" => Ok(RemoteOperationKind::Delete),
            other => Err(ReposyncError::Validation(format!(
                "Invalid remote operation '{}'. Must be one of: add, update, delete",
                other
            ))),
        }
    }
}

/// Run-wide remote operation as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIntent {
    pub kind: RemoteOperationKind,
    pub name: Option<String>,
    /// Prefix of every remote URL; the repository name is appended as-is
    pub base_url: Option<String>,
}

impl RemoteIntent {
    pub fn new(kind: RemoteOperationKind) -> Self {
        Self {
            kind,
            name: None,
            base_url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request for one repository
    ///
    /// The URL is `base_url + repo_name` with no separator inserted and no
    /// normalization of the base. Empty strings count as absent.
    pub fn request_for(&self, repo_name: &str) -> RemoteOperationRequest {
        let name = non_empty(self.name.as_deref());
        let url =
            non_empty(self.base_url.as_deref()).map(|base| format!("{}{}", base, repo_name));

        match self.kind {
            RemoteOperationKind::Add => RemoteOperationRequest::Add { name, url },
            RemoteOperationKind::Update => RemoteOperationRequest::Update { name, url },
            RemoteOperationKind::Delete => RemoteOperationRequest::Delete { name },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Per-repository remote operation, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperationRequest {
    Add {
        name: Option<String>,
        url: Option<String>,
    },
    Update {
        name: Option<String>,
        url: Option<String>,
    },
    Delete {
        name: Option<String>,
    },
}

impl RemoteOperationRequest {
    pub fn kind(&self) -> RemoteOperationKind {
        match self {
            RemoteOperationRequest::Add { .. } => RemoteOperationKind::Add,
            RemoteOperationRequest::Update { .. } => RemoteOperationKind::Update,
            RemoteOperationRequest::Delete { .. } => RemoteOperationKind::Delete,
        }
    }

    /// URL the operation would use, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            RemoteOperationRequest::Add { url, .. }
            | RemoteOperationRequest::Update { url, .. } => url.as_deref(),
            RemoteOperationRequest::Delete { .. } => None,
        }
    }

    /// Check required fields: Add and Update need a name and a URL, Delete
    /// needs a name.
    pub fn validate(self) -> Result<RemoteOperation, String> {
        match self {
            RemoteOperationRequest::Add {
                name: Some(name),
                url: Some(url),
            } => Ok(RemoteOperation::Add { name, url }),
            RemoteOperationRequest::Add { .. } => {
                Err("Remote name and URL are required for adding a remote".to_string())
            }
            RemoteOperationRequest::Update {
                name: Some(name),
                url: Some(url),
            } => Ok(RemoteOperation::Update { name, url }),
            RemoteOperationRequest::Update { .. } => {
                Err("Remote name and URL are required for updating a remote".to_string())
            }
            RemoteOperationRequest::Delete { name: Some(name) } => {
                Ok(RemoteOperation::Delete { name })
            }
            RemoteOperationRequest::Delete { name: None } => {
                Err("Remote name is required for deleting a remote".to_string())
            }
        }
    }
}

/// Validated remote operation, ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    Add { name: String, url: String },
    Update { name: String, url: String },
    Delete { name: String },
}

impl RemoteOperation {
    pub fn kind(&self) -> RemoteOperationKind {
        match self {
            RemoteOperation::Add { .. } => RemoteOperationKind::Add,
            RemoteOperation::Update { .. } => RemoteOperationKind::Update,
            RemoteOperation::Delete { .. } => RemoteOperationKind::Delete,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RemoteOperation::Add { name, .. }
            | RemoteOperation::Update { name, .. }
            | RemoteOperation::Delete { name } => name,
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::Add { name, url } => write!(f, "add remote {} ({})", name, url),
            RemoteOperation::Update { name, url } => write!(f, "update remote {} ({})", name, url),
            RemoteOperation::Delete { name } => write!(f, "delete remote {}", name),
        }
    }
}
