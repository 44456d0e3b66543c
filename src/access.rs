//! Access verification against the git hosting service
//!
//! One SSH handshake gates the whole run: if the hosting service does not
//! greet us as an authenticated user, no repository is touched.

use async_trait::async_trait;
use tracing::{debug, warn};

/// Phrase the hosting service prints after a successful SSH handshake
pub const SUCCESS_MARKER: &str = "successfully authenticated";

/// Precondition check run once before any repository work
#[async_trait]
pub trait AccessVerifier: Send + Sync {
    /// `true` when the hosting service accepted our credentials
    async fn verify_access(&self) -> bool;

    /// Human-readable target of the check, for messages
    fn target(&self) -> String;
}

/// Runs `ssh -T git@<host>` and looks for the success marker
#[derive(Debug, Clone)]
pub struct SshAccessVerifier {
    host: String,
    user: String,
}

impl SshAccessVerifier {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: "git".to_string(),
        }
    }

    /// Whether a handshake response contains the success marker (any case)
    pub fn response_indicates_success(&self, response: &str) -> bool {
        response.to_lowercase().contains(SUCCESS_MARKER)
    }
}

#[async_trait]
impl AccessVerifier for SshAccessVerifier {
    async fn verify_access(&self) -> bool {
        let target = self.target();
        match gitcmd::ssh_handshake(&target).await {
            Ok(output) => {
                // The greeting usually arrives on stderr
                let verified = self.response_indicates_success(&output.combined());
                debug!(ssh_target = %target, verified, "SSH handshake finished");
                verified
            }
            Err(e) => {
                warn!(ssh_target = %target, error = %e, "SSH handshake could not run");
                false
            }
        }
    }

    fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}
