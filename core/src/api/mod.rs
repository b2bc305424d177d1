//! HTTP clients for the hosted model endpoints.
//!
//! Two concerns, one error type: chat completions (locator suggestions) and
//! embeddings (retrieval vectors). Both are single blocking round trips —
//! no streaming, no retries, no timeout beyond reqwest's defaults.

mod chat;
mod embeddings;

pub use chat::ModelClient;
pub use embeddings::OpenAiEmbedder;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::Prompt;

/// Errors from API client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid configuration (typically a missing API key).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code.
        status: u16,
        /// Error body (or message) from the API.
        message: String,
    },

    /// Failed to pull the expected field out of a 2xx response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Seam for the patch generator: anything that can turn a prompt into a
/// single free-text completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> ApiResult<String>;
}

/// Seam for the retriever: anything that can embed a batch of texts into
/// fixed-dimension vectors, one per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>>;
}
