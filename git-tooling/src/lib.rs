//! Thin wrappers around the `git` binary used by the auto-heal pipeline.
//!
//! Every operation shells out to `git` via [`tokio::process::Command`] and
//! surfaces failures as [`GitError`]. There is deliberately no retry or
//! credential handling here: authentication is whatever the ambient git
//! configuration provides.

use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from git subprocess operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary could not be spawned at all.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// A git command exited with a non-zero status.
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// The subcommand that failed (e.g. "clone", "push").
        command: String,
        /// Trimmed stderr from the failed invocation.
        stderr: String,
    },

    /// `checkout -b` refused because the branch already exists.
    ///
    /// Branch creation is not idempotent; a re-run after a partial failure
    /// hits this and must be resolved by a human.
    #[error("branch '{0}' already exists")]
    BranchExists(String),
}

pub type Result<T> = std::result::Result<T, GitError>;

/// Runs `git <args>` in `dir` and returns stdout on success.
async fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    debug!("git {:?} (in {})", args, dir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(GitError::CommandFailed {
            command: args.first().unwrap_or(&"git").to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Ensures a local clone of `url` exists at `dest`.
///
/// Idempotent: clones when the directory is absent, otherwise pulls the
/// current branch. Clone and network failures propagate.
pub async fn ensure_clone(url: &str, dest: &Path) -> Result<()> {
    if dest.join(".git").is_dir() {
        run_git(dest, &["pull"]).await?;
        return Ok(());
    }

    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let dest_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    run_git(parent, &["clone", url, &dest_name]).await?;
    Ok(())
}

/// Returns the concatenated patch text of the most recent commits whose
/// diff contains `keyword` (`git log -S`). Zero matches yields an empty
/// string, which is not an error.
pub async fn log_search(repo: &Path, keyword: &str, max_commits: u32) -> Result<String> {
    let pickaxe = format!("-S{keyword}");
    let limit = format!("-n{max_commits}");
    run_git(repo, &["log", &pickaxe, "-p", &limit]).await
}

/// Creates and checks out a new branch. Fails with [`GitError::BranchExists`]
/// when a branch of that name is already present.
pub async fn create_branch(repo: &Path, name: &str) -> Result<()> {
    match run_git(repo, &["checkout", "-b", name]).await {
        Ok(_) => Ok(()),
        Err(GitError::CommandFailed { stderr, .. }) if stderr.contains("already exists") => {
            Err(GitError::BranchExists(name.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Stages a single path relative to the repository root.
pub async fn stage(repo: &Path, path: &str) -> Result<()> {
    run_git(repo, &["add", path]).await?;
    Ok(())
}

/// Commits staged changes with the given message.
pub async fn commit(repo: &Path, message: &str) -> Result<()> {
    run_git(repo, &["commit", "-m", message]).await?;
    Ok(())
}

/// Pushes `branch` to origin, setting the upstream tracking ref.
pub async fn push_upstream(repo: &Path, branch: &str) -> Result<()> {
    run_git(repo, &["push", "--set-upstream", "origin", branch]).await?;
    Ok(())
}

/// Sanitizes a string for use as a git ref component: anything outside
/// `[A-Za-z0-9._-]` becomes `-`, and leading/trailing separators are
/// stripped.
pub fn sanitize_ref_component(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "ref".to_string()
    } else {
        trimmed.to_string()
    }
}
