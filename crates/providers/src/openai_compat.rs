//! OpenAI-compatible chat-completion provider.
//!
//! Works with OpenAI, vLLM, Ollama, and any gateway exposing
//! `POST {base}/v1/chat/completions`. Only non-streaming completions are
//! used: one request per turn, fixed sampling parameters, bounded timeout,
//! no retry.

use async_trait::async_trait;
use groundrag_config::LlmConfig;
use groundrag_core::error::AnswerFailure;
use groundrag_core::message::Turn;
use groundrag_core::Provider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider with default sampling (512 tokens, temperature 0).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name: "openai-compat".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 512,
            temperature: 0.0,
            client,
        })
    }

    /// Build from the `[llm]` config section. Missing key/base become empty
    /// strings; callers are expected to have run `require_credentials` first.
    pub fn from_config(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            config.api_base.clone().unwrap_or_default(),
            config.api_key.clone().unwrap_or_default(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?
        .with_sampling(config.max_tokens, config.temperature))
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// The full endpoint URL requests are posted to.
    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, turn: &'a Turn) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: turn
                .messages()
                .into_iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Extract `choices[0].message.content` from a 2xx body.
fn parse_completion(body: &str) -> Result<String, AnswerFailure> {
    let malformed = || AnswerFailure::MalformedResponse {
        raw_body: body.to_string(),
    };

    let parsed: ApiResponse = serde_json::from_str(body).map_err(|_| malformed())?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(malformed)
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, turn: &Turn) -> Result<String, AnswerFailure> {
        let url = self.chat_url();
        let body = self.request_body(turn);

        debug!(
            provider = %self.name,
            model = %self.model,
            system_chars = turn.system.content.chars().count(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerFailure::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnswerFailure::Transport {
                detail: e.to_string(),
            })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "Chat endpoint returned error");
            return Err(AnswerFailure::Upstream {
                status_code: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
