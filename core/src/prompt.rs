//! Prompt construction for the patch generator.

/// A fixed two-field prompt: system role plus user content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You are a senior test automation assistant.";

/// Builds the validate-only prompt from a failure summary and the retrieved
/// past failures.
pub fn build_failure_prompt(failure_summary: &str, retrieved: &[String]) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Failure: {failure_summary}\nSimilar past failures: {}\nPlease suggest a patch and rationale.",
            retrieved.join("; ")
        ),
    }
}

/// Builds the heal-flow prompt: retrieved context plus the request for a
/// replacement XPath.
pub fn build_fix_prompt(mapping_name: &str, current_locator: &str, retrieved: &[String]) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Current failing mapping: {mapping_name}\nPrevious XPath: {current_locator}\n\nRelevant context:\n{}\n\nSuggest new XPath for the failed element.",
            retrieved.join("\n---\n")
        ),
    }
}

/// Assembles the evidence corpus the retriever indexes for the heal flow:
/// the failing mapping, its current locator, recent app-code diffs and the
/// snapshot element descriptions.
pub fn build_fix_context(
    mapping_name: &str,
    current_locator: &str,
    app_diffs: &str,
    snapshot_description: &str,
) -> String {
    format!(
        "Current failing mapping: {mapping_name}\nPrevious XPath: {current_locator}\n\nRecent app code changes:\n{app_diffs}\n\nAppium Inspector elements:\n{snapshot_description}\n\nPlease suggest a more robust Appium XPath.\n"
    )
}
