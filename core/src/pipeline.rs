//! The two pipeline entry points.
//!
//! `heal` is the full flow: load records, gather evidence, retrieve, ask
//! the model, apply the fix and publish it on a review branch. `validate`
//! is the shorter CI-listener flow: retrieve past failures, ask the model
//! for a patch and execute it under the sandbox validator.
//!
//! Both are strictly sequential; every external call blocks the run.

use std::path::Path;

use tracing::{info, warn};

use crate::HealError;
use crate::api::{CompletionProvider, Embedder, ModelClient, OpenAiEmbedder};
use crate::config::Config;
use crate::mappings;
use crate::patch::{self, LocatorSuggestion};
use crate::prompt;
use crate::publish;
use crate::retrieval::{Retriever, split_text};
use crate::sandbox::{SandboxValidator, ValidationOutput};
use crate::snapshot;

/// Result of a full heal run.
#[derive(Debug)]
pub struct HealOutcome {
    pub failing_name: String,
    /// Identifier before the fix; `None` when no mapping record matched.
    pub old_identifier: Option<String>,
    /// Raw model suggestion text.
    pub suggestion: String,
    /// Identifier written to the mappings file.
    pub new_identifier: Option<String>,
    /// Whether a mapping record was actually rewritten.
    pub applied: bool,
    /// Review branch the fix was pushed on.
    pub branch: String,
}

/// Result of a validate-only run.
#[derive(Debug)]
pub struct ValidateOutcome {
    /// Raw model patch text.
    pub patch: String,
    /// Captured output of the sandboxed runner.
    pub validation: ValidationOutput,
}

/// Pipeline with explicit components; construction decides which model and
/// embedding backends are used, and tests substitute their own. A pipeline
/// value is consumed by one run.
pub struct Pipeline<'a> {
    config: &'a Config,
    provider: Box<dyn CompletionProvider>,
    embedder: Box<dyn Embedder>,
}

impl<'a> Pipeline<'a> {
    /// Builds a pipeline backed by the hosted model API. Fails when the API
    /// key is missing.
    pub fn new(config: &'a Config) -> Result<Self, HealError> {
        let provider = ModelClient::new(config)?;
        let embedder = OpenAiEmbedder::new(config)?;
        Ok(Self {
            config,
            provider: Box::new(provider),
            embedder: Box::new(embedder),
        })
    }

    /// Builds a pipeline from explicit components (test seam).
    pub fn with_components(
        config: &'a Config,
        provider: Box<dyn CompletionProvider>,
        embedder: Box<dyn Embedder>,
    ) -> Self {
        Self {
            config,
            provider,
            embedder,
        }
    }

    /// Full heal flow for one failing mapping name.
    pub async fn heal(
        self,
        failing_name: &str,
        snapshot_path: Option<&Path>,
    ) -> Result<HealOutcome, HealError> {
        let config = self.config;

        let mut records = mappings::load_mappings(&config.mappings_file)?;
        // Function references and the test flow are informational context;
        // loading them also validates the input set is complete.
        let _functions = mappings::load_opaque(&config.functions_file)?;
        let _test_flow = mappings::load_opaque(&config.test_flow_file)?;

        let old_identifier =
            mappings::current_identifier(failing_name, &records).map(str::to_string);
        if old_identifier.is_none() {
            warn!("no mapping record named {failing_name}; fix cannot be applied");
        }
        let current = old_identifier.as_deref().unwrap_or("");

        let app_diffs = crate::history::fetch_app_changes(config).await?;
        let snapshot_description = snapshot::describe_snapshot(snapshot_path);

        let corpus =
            prompt::build_fix_context(failing_name, current, &app_diffs, &snapshot_description);
        let chunks = split_text(&corpus, config.chunk_size, config.chunk_overlap);

        let mut retriever = Retriever::new(self.embedder);
        retriever.add_documents(&chunks).await?;
        let retrieved = retriever
            .query("Suggest new XPath for the failed element.", config.retrieval_k)
            .await?;

        let fix_prompt = prompt::build_fix_prompt(failing_name, current, &retrieved);
        let suggestion = self.provider.complete(&fix_prompt).await?;
        info!("model suggestion received ({} chars)", suggestion.len());

        let (new_identifier, applied) = match patch::extract_locator(&suggestion) {
            LocatorSuggestion::Found(locator) => {
                let applied = mappings::update_identifier(failing_name, &locator, &mut records);
                (Some(locator), applied)
            }
            LocatorSuggestion::NotFound => {
                // Caller-side fallback policy: keep the prior identifier.
                warn!("no locator found in suggestion; keeping prior identifier");
                (old_identifier.clone(), false)
            }
        };
        mappings::save_mappings(&config.mappings_file, &records)?;

        let branch = publish::publish_fix(config, failing_name, &records).await?;

        Ok(HealOutcome {
            failing_name: failing_name.to_string(),
            old_identifier,
            suggestion,
            new_identifier,
            applied,
            branch,
        })
    }

    /// Validate-only flow: retrieve similar past failures, generate a patch
    /// and execute it under the sandbox runner.
    pub async fn validate(
        self,
        failure_summary: &str,
        past_failures: &[String],
    ) -> Result<ValidateOutcome, HealError> {
        let config = self.config;

        let mut retriever = Retriever::new(self.embedder);
        retriever.add_documents(past_failures).await?;
        let retrieved = retriever.query(failure_summary, config.retrieval_k).await?;

        let failure_prompt = prompt::build_failure_prompt(failure_summary, &retrieved);
        let patch = self.provider.complete(&failure_prompt).await?;
        info!("generated patch ({} chars)", patch.len());

        let validator = SandboxValidator::new(config);
        let validation = validator.run_patch(&patch).await?;

        Ok(ValidateOutcome { patch, validation })
    }
}
