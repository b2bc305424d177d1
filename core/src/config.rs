//! Layered configuration for the auto-heal pipeline.
//!
//! Precedence, lowest to highest:
//! 1. Hardcoded defaults (the sample Walmart repos from the original flow)
//! 2. Optional `autoheal.toml` file
//! 3. Environment (`OPENAI_API_KEY` for the model/embedding credential)
//!
//! The resulting [`Config`] is passed by reference to every component; no
//! module reads globals or mutates the process working directory.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error loading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fully resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions and embeddings endpoints. Empty when
    /// unset; components that need it fail at construction time.
    pub openai_api_key: String,
    /// Chat model used for locator suggestions.
    pub model: String,
    /// Embedding model used by the retriever.
    pub embedding_model: String,
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,

    /// App code repository (where locator-breaking changes land).
    pub app_repo_url: String,
    /// Local checkout path for the app repository.
    pub app_repo_path: PathBuf,
    /// Automation repository that owns the mappings file.
    pub automation_repo_url: String,
    /// Local checkout path for the automation repository.
    pub automation_repo_path: PathBuf,

    /// Mapping records consumed and rewritten by the pipeline.
    pub mappings_file: PathBuf,
    /// Function-reference records (read-only context).
    pub functions_file: PathBuf,
    /// Test-flow records (read-only context).
    pub test_flow_file: PathBuf,

    /// Number of recent commits scanned for the history keyword.
    pub history_depth: u32,
    /// Pickaxe keyword used to filter app-repo commits.
    pub history_keyword: String,

    /// Top-K nearest documents returned by the retriever.
    pub retrieval_k: usize,
    /// Character length of retrieval chunks.
    pub chunk_size: usize,
    /// Character overlap between adjacent chunks.
    pub chunk_overlap: usize,

    /// Test runner executed by the sandbox validator.
    pub sandbox_runner: String,
    /// Wall-clock limit for a sandbox run, in seconds.
    pub sandbox_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            model: "gpt-4".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            app_repo_url: "https://gecgithub01.walmart.com/Walmart-iOS.git".to_string(),
            app_repo_path: PathBuf::from("./Walmart-iOS"),
            automation_repo_url: "https://gecgithub01.walmart.com/MobileQE/glass-automation.git"
                .to_string(),
            automation_repo_path: PathBuf::from("./glass-automation"),
            mappings_file: PathBuf::from("mappings-ios.yaml"),
            functions_file: PathBuf::from("functions.yaml"),
            test_flow_file: PathBuf::from("C2707319-vision-flow-mixed-order.yaml"),
            history_depth: 5,
            history_keyword: "Select lenses".to_string(),
            retrieval_k: 3,
            chunk_size: 512,
            chunk_overlap: 64,
            sandbox_runner: "pytest".to_string(),
            sandbox_timeout_secs: 120,
        }
    }
}

/// File overlay: every field optional so a config file only has to name what
/// it changes.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    model: Option<String>,
    embedding_model: Option<String>,
    api_base: Option<String>,
    app_repo_url: Option<String>,
    app_repo_path: Option<PathBuf>,
    automation_repo_url: Option<String>,
    automation_repo_path: Option<PathBuf>,
    mappings_file: Option<PathBuf>,
    functions_file: Option<PathBuf>,
    test_flow_file: Option<PathBuf>,
    history_depth: Option<u32>,
    history_keyword: Option<String>,
    retrieval_k: Option<usize>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    sandbox_runner: Option<String>,
    sandbox_timeout_secs: Option<u64>,
}

impl Config {
    /// Loads configuration: defaults, then the TOML file at `path` (when
    /// given and present), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = path
            && path.is_file()
        {
            let raw = std::fs::read_to_string(path)?;
            let file: ConfigFile = toml::from_str(&raw)?;
            config.apply_file(file);
        }

        if let Ok(key) = env::var(API_KEY_ENV) {
            config.openai_api_key = key;
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = file.$field {
                    self.$field = v;
                })*
            };
        }
        overlay!(
            model,
            embedding_model,
            api_base,
            app_repo_url,
            app_repo_path,
            automation_repo_url,
            automation_repo_path,
            mappings_file,
            functions_file,
            test_flow_file,
            history_depth,
            history_keyword,
            retrieval_k,
            chunk_size,
            chunk_overlap,
            sandbox_runner,
            sandbox_timeout_secs,
        );
    }
}
