use thiserror::Error;

use crate::api::ApiError;
use autoheal_git_tooling::GitError;

/// Top-level error for pipeline runs.
///
/// There is intentionally no recovery logic behind these: clone, API and
/// filesystem failures are fatal to the run and surface to the CLI as-is.
#[derive(Debug, Error)]
pub enum HealError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
