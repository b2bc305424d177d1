//! App-repository history fetching.
//!
//! Ensures a local clone of the app code repository exists, then pulls the
//! patch text of the most recent commits whose diff touches the configured
//! keyword. Clone and network failures are fatal to the run.

use tracing::info;

use crate::HealError;
use crate::config::Config;

/// Returns the concatenated diffs of recent app-repo commits matching the
/// configured history keyword. Zero matching commits yields an empty string.
pub async fn fetch_app_changes(config: &Config) -> Result<String, HealError> {
    autoheal_git_tooling::ensure_clone(&config.app_repo_url, &config.app_repo_path).await?;
    let diffs = autoheal_git_tooling::log_search(
        &config.app_repo_path,
        &config.history_keyword,
        config.history_depth,
    )
    .await?;
    info!(
        "fetched {} bytes of history for keyword '{}'",
        diffs.len(),
        config.history_keyword
    );
    Ok(diffs)
}
