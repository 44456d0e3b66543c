//! Async wrapper for the git and ssh command line tools
//!
//! A thin, type-safe interface over the system `git` binary (and the `ssh`
//! client used for access checks). Every call spawns a child process through
//! [`tokio::process::Command`] and awaits its completion, so many working
//! copies can be driven concurrently from one runtime.
//!
//! This crate only runs commands and reports what happened. It does not
//! decide whether a failure matters; callers inspect [`CommandOutput`] or the
//! returned [`Error`] and choose a policy.
//!
//! # Example
//!
//! ```no_run
//! use gitcmd::Git;
//!
//! # async fn demo() -> gitcmd::Result<()> {
//! let git = Git::with_workdir("/tmp/some-repo");
//! let branch = git.current_branch().await?;
//! git.fetch().await?;
//! git.pull("origin", &branch).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors that can occur when running git or ssh
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} is not installed or not in PATH")]
    NotInstalled(String),

    #[error("{program} {command} failed: {stderr}")]
    CommandFailed {
        program: String,
        command: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git and ssh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Output from a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Get combined stdout and stderr output
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Git CLI wrapper bound to an optional working directory
#[derive(Debug, Clone, Default)]
pub struct Git {
    /// Working directory
    workdir: Option<PathBuf>,
    /// Global flags to pass to all git commands (e.g. `-c key=value`)
    global_flags: Vec<String>,
}

impl Git {
    /// Create a wrapper that runs in the current process directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific working directory
    pub fn with_workdir(path: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(path.into()),
            global_flags: Vec::new(),
        }
    }

    /// Add a global flag
    pub fn add_global_flag(&mut self, flag: impl Into<String>) {
        self.global_flags.push(flag.into());
    }

    /// Check if git is available
    pub async fn is_available(&self) -> bool {
        self.run_command(&["--version"]).await.is_ok()
    }

    // --- Branches ---

    /// Name of the checked-out branch (`git rev-parse --abbrev-ref HEAD`)
    pub async fn current_branch(&self) -> Result<String> {
        let output = self.run_command(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Check out an existing branch
    pub async fn checkout(&self, branch: &str) -> Result<CommandOutput> {
        self.run_command(&["checkout", branch]).await
    }

    /// Create a branch from `start_point` and check it out
    pub async fn checkout_new_branch(
        &self,
        branch: &str,
        start_point: &str,
    ) -> Result<CommandOutput> {
        self.run_command(&["checkout", "-b", branch, start_point]).await
    }

    // --- Sync ---

    /// Clone `url` into `dest`
    ///
    /// Runs without a working directory requirement; `dest` may be absolute.
    pub async fn clone_into(&self, url: &str, dest: &Path) -> Result<CommandOutput> {
        let dest = dest.to_string_lossy();
        self.run_command(&["clone", url, dest.as_ref()]).await
    }

    /// Fetch from the default remote
    pub async fn fetch(&self) -> Result<CommandOutput> {
        self.run_command(&["fetch"]).await
    }

    /// Pull `branch` from `remote`
    pub async fn pull(&self, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run_command(&["pull", remote, branch]).await
    }

    // --- Remotes ---

    /// URL configured for a remote
    pub async fn remote_get_url(&self, name: &str) -> Result<String> {
        let output = self.run_command(&["remote", "get-url", name]).await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Add a remote
    pub async fn remote_add(&self, name: &str, url: &str) -> Result<CommandOutput> {
        self.run_command(&["remote", "add", name, url]).await
    }

    /// Change the URL of an existing remote
    pub async fn remote_set_url(&self, name: &str, url: &str) -> Result<CommandOutput> {
        self.run_command(&["remote", "set-url", name, url]).await
    }

    /// Remove a remote
    pub async fn remote_remove(&self, name: &str) -> Result<CommandOutput> {
        self.run_command(&["remote", "remove", name]).await
    }

    // --- Commits ---

    /// Stage the whole working tree (`git add .`)
    pub async fn add_all(&self) -> Result<CommandOutput> {
        self.run_command(&["add", "."]).await
    }

    /// Commit staged changes, creating a commit even when nothing changed
    pub async fn commit_allow_empty(&self, message: &str) -> Result<CommandOutput> {
        self.run_command(&["commit", "-m", message, "--allow-empty"]).await
    }

    // --- Internal ---

    async fn run_command(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new("git");

        // Global flags go before the subcommand
        for flag in &self.global_flags {
            cmd.arg(flag);
        }
        cmd.args(args);

        if let Some(ref dir) = self.workdir {
            if !dir.is_dir() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("working directory {} does not exist", dir.display()),
                )));
            }
            cmd.current_dir(dir);
        }

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        run("git", args, cmd).await
    }
}

/// Run `ssh -T <target>` and return whatever the server answered
///
/// Hosting services close the session right after the greeting and report a
/// non-zero exit status even when authentication worked, so the output is
/// returned regardless of status and only spawn failures are errors.
pub async fn ssh_handshake(target: &str) -> Result<CommandOutput> {
    let mut cmd = Command::new("ssh");
    cmd.args(["-T", target]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!(%target, "spawning ssh handshake");
    let output = cmd.output().await.map_err(|e| spawn_error("ssh", e))?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

async fn run(program: &str, args: &[&str], mut cmd: Command) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!(program, args = ?args, "spawning command");

    let output = cmd.output().await.map_err(|e| spawn_error(program, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(Error::CommandFailed {
            program: program.to_string(),
            command: args.first().copied().unwrap_or_default().to_string(),
            stderr: if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            },
        });
    }

    Ok(CommandOutput {
        success: true,
        stdout,
        stderr,
    })
}

fn spawn_error(program: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::NotInstalled(program.to_string())
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_combined() {
        let out = CommandOutput {
            success: true,
            stdout: "out".to_string(),
            stderr: String::new(),
        };
        assert_eq!(out.combined(), "out");

        let out = CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: "err".to_string(),
        };
        assert_eq!(out.combined(), "err");

        let out = CommandOutput {
            success: true,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(out.combined(), "out\nerr");
    }

    #[test]
    fn test_with_workdir() {
        let mut git = Git::with_workdir("/tmp/repo");
        git.add_global_flag("-c");
        git.add_global_flag("color.ui=never");
        assert_eq!(git.workdir.as_deref(), Some(Path::new("/tmp/repo")));
        assert_eq!(git.global_flags, vec!["-c", "color.ui=never"]);
        assert!(Git::new().workdir.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = Error::CommandFailed {
            program: "git".to_string(),
            command: "checkout".to_string(),
            stderr: "pathspec 'x' did not match".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git checkout failed: pathspec 'x' did not match"
        );
        assert_eq!(
            Error::NotInstalled("ssh".to_string()).to_string(),
            "ssh is not installed or not in PATH"
        );
    }

    #[tokio::test]
    async fn test_missing_workdir_is_an_error() {
        let git = Git::with_workdir("/nonexistent/reposync/gitcmd-test");
        assert!(git.current_branch().await.is_err());
    }

    // Tests below need a git binary and return early without one

    /// Fresh repository on `main` with an identity and no signing
    async fn fresh_repo(dir: &Path) -> Git {
        let mut git = Git::with_workdir(dir);
        for flag in [
            "user.name=Test",
            "user.email=test@example.com",
            "commit.gpgsign=false",
        ] {
            git.add_global_flag("-c");
            git.add_global_flag(flag);
        }
        git.run_command(&["init", "-q"]).await.unwrap();
        git.run_command(&["symbolic-ref", "HEAD", "refs/heads/main"])
            .await
            .unwrap();
        git
    }

    #[tokio::test]
    async fn test_empty_commits_in_fresh_repo() {
        if !Git::new().is_available().await {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let git = fresh_repo(dir.path()).await;

        git.add_all().await.unwrap();
        assert!(git.commit_allow_empty("first").await.unwrap().success);
        assert!(git.commit_allow_empty("second").await.unwrap().success);
        assert_eq!(git.current_branch().await.unwrap(), "main");
    }

    #[tokio::test]
    async fn test_checkout_new_branch_needs_start_point() {
        if !Git::new().is_available().await {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let git = fresh_repo(dir.path()).await;
        git.commit_allow_empty("root").await.unwrap();

        let err = git.checkout("feature/x").await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { ref command, .. } if command == "checkout"));
        assert!(git.checkout_new_branch("feature/x", "origin/main").await.is_err());

        git.checkout_new_branch("feature/x", "main").await.unwrap();
        assert_eq!(git.current_branch().await.unwrap(), "feature/x");
        git.checkout("main").await.unwrap();
        assert_eq!(git.current_branch().await.unwrap(), "main");
    }

    #[tokio::test]
    async fn test_remote_lifecycle() {
        if !Git::new().is_available().await {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let git = fresh_repo(dir.path()).await;

        git.remote_add("mirror", "git@example.com:org/a.git")
            .await
            .unwrap();
        assert_eq!(
            git.remote_get_url("mirror").await.unwrap(),
            "git@example.com:org/a.git"
        );
        let err = git
            .remote_add("mirror", "git@example.com:org/a.git")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        git.remote_set_url("mirror", "git@example.com:org/b.git")
            .await
            .unwrap();
        assert_eq!(
            git.remote_get_url("mirror").await.unwrap(),
            "git@example.com:org/b.git"
        );

        git.remote_remove("mirror").await.unwrap();
        assert!(git.remote_get_url("mirror").await.is_err());
    }
}
