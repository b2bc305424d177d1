//! Embeddings client backing the retriever.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, ApiResult, Embedder};
use crate::config::Config;

/// Client for an OpenAI-compatible `/embeddings` endpoint. Batches all
/// inputs into one request; vectors come back in input order.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    /// Builds an embedder from configuration. Fails when no API key is set.
    pub fn new(config: &Config) -> ApiResult<Self> {
        if config.openai_api_key.is_empty() {
            return Err(ApiError::InvalidConfig(format!(
                "{} is not set",
                crate::config::API_KEY_ENV
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.embedding_model.clone(),
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let url = format!("{}/embeddings", self.api_base);
        debug!("embedding {} texts via {url}", texts.len());
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiResponse { status, message });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(ApiError::Parse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}
