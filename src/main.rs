//! reposync - Multi-repository workspace reconciliation
//!
//! Main entry point for the reposync CLI.

use anyhow::Context;
use clap::Parser;
use reposync::access::SshAccessVerifier;
use reposync::catalog::{Catalog, ExclusionSet};
use reposync::config::RunConfig;
use reposync::git::GitClient;
use reposync::orchestrator::WorkspaceOrchestrator;
use reposync::reconcile::{RemoteIntent, RemoteOperationKind, RunOptions};
use reposync::{metrics, style};
use std::path::PathBuf;
use std::process;

/// reposync - Clone, update and align every repository of a project
#[derive(Parser, Debug)]
#[command(name = "reposync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print the effective configuration and catalog, and enable debug logging
    #[arg(long)]
    debug: bool,

    /// Commit in every repository (empty commits allowed)
    #[arg(long, requires = "message")]
    commit: bool,

    /// Commit message used with --commit
    #[arg(short, long)]
    message: Option<String>,

    /// Repositories excluded from remote management and commits
    #[arg(short, long = "exclude", value_name = "REPO", num_args = 1..)]
    exclude: Vec<String>,

    /// Remote operation applied to every repository
    #[arg(long, value_parser = ["add", "update", "delete"])]
    remote_operation: Option<String>,

    /// Name of the remote to manage
    #[arg(long)]
    remote_name: Option<String>,

    /// Base URL of the remote; the repository name is appended verbatim
    #[arg(long)]
    remote_url: Option<String>,

    /// Path to config file (default: ~/.config/reposync/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON catalog replacing the embedded one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Maximum number of repositories reconciled at once
    #[arg(short = 'j', long, env = "REPOSYNC_MAX_PARALLEL")]
    max_parallel: Option<usize>,

    /// Directory holding the working copies (default: parent of the current directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Organization owning the repositories
    #[arg(long)]
    org: Option<String>,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = reposync::logging::init(cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style::fail_mark(), style::error(&e.to_string()));
        if e.is_access_denied() {
            eprintln!("Please check your SSH configuration");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> reposync::Result<()> {
    let config = load_config(&cli)?;

    let catalog = match config.catalog_path {
        Some(ref path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::embedded().context("Embedded catalog is invalid")?,
    };
    tracing::info!(repositories = catalog.len(), "Catalog loaded");

    let options = run_options(&cli)?;

    if cli.debug {
        println!("{}", serde_json::to_string_pretty(&config)?);
        println!("{}", serde_json::to_string_pretty(&catalog.names())?);
        println!("{}", serde_json::to_string_pretty(&options.exclusions.sorted())?);
    }

    println!(
        "Initializing project {}",
        style::header(&config.project_name)
    );

    let vcs = GitClient::from_config(&config);
    if !vcs.is_available().await {
        return Err(reposync::ReposyncError::Config(
            "git is not installed or not in PATH".to_string(),
        ));
    }
    let verifier = SshAccessVerifier::new(config.host.clone());
    let orchestrator =
        WorkspaceOrchestrator::new(config, catalog, vcs, verifier)?.with_options(options);

    let summary = orchestrator.run().await?;
    println!("{}", summary.render());

    if cli.metrics {
        eprintln!("{}", metrics::encode_metrics()?);
    }

    // Partial failure is reported above, not through the exit status
    if !summary.is_clean() {
        tracing::warn!("Some repositories were not fully reconciled");
    }
    Ok(())
}

/// Defaults, then the YAML file, then command-line overrides
fn load_config(cli: &Cli) -> reposync::Result<RunConfig> {
    let mut config = match cli.config {
        Some(ref path) => RunConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RunConfig::load_default()?,
    };
    apply_overrides(cli, &mut config);
    Ok(config)
}

fn apply_overrides(cli: &Cli, config: &mut RunConfig) {
    if let Some(max_parallel) = cli.max_parallel {
        config.max_parallel = max_parallel;
    }
    if let Some(ref dir) = cli.base_dir {
        config.base_dir = Some(dir.clone());
    }
    if let Some(ref org) = cli.org {
        config.org = org.clone();
    }
    if let Some(ref catalog) = cli.catalog {
        config.catalog_path = Some(catalog.clone());
    }
}

fn run_options(cli: &Cli) -> reposync::Result<RunOptions> {
    let mut options =
        RunOptions::new().with_exclusions(cli.exclude.iter().cloned().collect::<ExclusionSet>());

    // Without --commit the message is ignored
    if let (true, Some(message)) = (cli.commit, cli.message.as_ref()) {
        options = options.with_commit_message(message.clone());
    }

    if let Some(ref selector) = cli.remote_operation {
        let kind: RemoteOperationKind = selector.parse()?;
        let mut intent = RemoteIntent::new(kind);
        if let Some(ref name) = cli.remote_name {
            intent = intent.with_name(name.clone());
        }
        if let Some(ref url) = cli.remote_url {
            intent = intent.with_base_url(url.clone());
        }
        options = options.with_remote(intent);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("reposync").chain(args.iter().copied()))
    }

    #[test]
    fn test_exclude_accepts_a_list() {
        let cli = parse(&["--exclude", "a", "b"]).unwrap();
        assert_eq!(cli.exclude, vec!["a", "b"]);
    }

    #[test]
    fn test_exclude_is_repeatable() {
        let cli = parse(&["--exclude", "a", "-e", "b", "--exclude", "c", "d"]).unwrap();
        assert_eq!(cli.exclude, vec!["a", "b", "c", "d"]);

        let options = run_options(&cli).unwrap();
        assert_eq!(options.exclusions.sorted(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_commit_requires_message() {
        assert!(parse(&["--commit"]).is_err());

        let cli = parse(&["--commit", "--message", "Align branches"]).unwrap();
        let options = run_options(&cli).unwrap();
        assert_eq!(options.commit_message.as_deref(), Some("Align branches"));
    }

    #[test]
    fn test_message_without_commit_commits_nothing() {
        let cli = parse(&["-m", "ignored"]).unwrap();
        assert!(run_options(&cli).unwrap().commit_message.is_none());
    }

    #[test]
    fn test_remote_flags_build_intent() {
        let cli = parse(&[
            "--remote-operation",
            "update",
            "--remote-name",
            "mirror",
            "--remote-url",
            "git@gitlab.com:mirror/",
        ])
        .unwrap();
        let remote = run_options(&cli).unwrap().remote.unwrap();
        assert_eq!(remote.kind, RemoteOperationKind::Update);
        assert_eq!(remote.name.as_deref(), Some("mirror"));
        assert_eq!(remote.base_url.as_deref(), Some("git@gitlab.com:mirror/"));

        assert!(parse(&["--remote-operation", "rename"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&[
            "--max-parallel",
            "2",
            "--org",
            "acme",
            "--base-dir",
            "/srv/w",
        ])
        .unwrap();
        let mut config = RunConfig::default();
        apply_overrides(&cli, &mut config);
        assert_eq!(config.max_parallel, 2);
        assert_eq!(config.org, "acme");
        assert_eq!(config.base_dir, Some(PathBuf::from("/srv/w")));
    }
}
