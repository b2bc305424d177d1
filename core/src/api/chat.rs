//! Chat-completions client for locator suggestions.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, ApiResult, CompletionProvider};
use crate::config::Config;
use crate::prompt::Prompt;

/// Non-streaming client for an OpenAI-compatible `/chat/completions`
/// endpoint. One request per suggestion; the model's first choice is the
/// whole answer.
pub struct ModelClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ModelClient {
    /// Builds a client from configuration. Fails when no API key is set.
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
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl CompletionProvider for ModelClient {
    async fn complete(&self, prompt: &Prompt) -> ApiResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!("requesting completion from {url} (model {})", self.model);
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

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ApiError::Parse("response contained no choices".to_string()))
    }
}
