//! Publishing a fixed mappings file to the automation repository.
//!
//! The fix lands on a fresh `auto-fix-*` branch pushed upstream for human
//! review; no pull request is created here. Branch creation is not
//! idempotent — a leftover branch from an earlier run fails the push flow
//! and surfaces as [`GitError::BranchExists`](autoheal_git_tooling::GitError).

use tracing::info;

use crate::HealError;
use crate::config::Config;
use crate::mappings::{self, MappingRecord};

/// Derives the review branch name from the failing mapping's last
/// dot-separated segment.
pub fn branch_name_for(failing_name: &str) -> String {
    let segment = failing_name.rsplit('.').next().unwrap_or(failing_name);
    format!("auto-fix-{}", autoheal_git_tooling::sanitize_ref_component(segment))
}

/// Writes the in-memory mapping records into the automation repository's
/// working tree, commits them on a new branch and pushes it upstream.
/// Returns the branch name.
pub async fn publish_fix(
    config: &Config,
    failing_name: &str,
    records: &[MappingRecord],
) -> Result<String, HealError> {
    autoheal_git_tooling::ensure_clone(&config.automation_repo_url, &config.automation_repo_path)
        .await?;

    let branch = branch_name_for(failing_name);
    autoheal_git_tooling::create_branch(&config.automation_repo_path, &branch).await?;

    let file_name = config
        .mappings_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mappings-ios.yaml".to_string());
    let target = config.automation_repo_path.join(&file_name);
    mappings::save_mappings(&target, records)?;

    autoheal_git_tooling::stage(&config.automation_repo_path, &file_name).await?;
    autoheal_git_tooling::commit(
        &config.automation_repo_path,
        &format!("[auto-heal] Fixed identifier for {failing_name}"),
    )
    .await?;
    autoheal_git_tooling::push_upstream(&config.automation_repo_path, &branch).await?;

    info!("pushed fix for {failing_name} on branch {branch}");
    Ok(branch)
}
