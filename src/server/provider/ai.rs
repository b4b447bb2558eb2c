//! Client for an OpenAI-compatible chat completion API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::server::{
    config::Config,
    error::{ai::AiError, provider::ProviderError, Error},
    provider::ensure_success,
};

const PROVIDER: &str = "AI";
const TEMPERATURE: f32 = 0.2;

/// Timeout for fetching a page to suggest listing metadata from.
pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Bytes of a fetched page kept for metadata extraction.
pub const PAGE_FETCH_MAX_BYTES: usize = 200 * 1024;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions API client.
///
/// AI features are optional; without an API key every call fails with
/// [`AiError::Disabled`].
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    /// Creates a client for the AI API at `config.ai_api_url`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.ai_api_url.clone(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        }
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends a system and user prompt, returning the first choice's content.
    ///
    /// # Returns
    /// - `Ok(String)` - Assistant reply
    /// - `Err(Error::AiError(AiError::Disabled))` - No API key configured
    /// - `Err(Error::ProviderError)` - API error status or a reply without content
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, Error> {
        let api_key = self.api_key.as_deref().ok_or(AiError::Disabled)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let completion: ChatCompletionResponse =
            ensure_success(PROVIDER, response).await?.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse {
                    provider: PROVIDER,
                    reason: "reply has no content".to_string(),
                }
                .into()
            })
    }

    /// Fetches up to [`PAGE_FETCH_MAX_BYTES`] of a web page as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String, Error> {
        let failed = |reason: String| AiError::PageFetchFailed {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .http
            .get(url)
            .timeout(PAGE_FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())).into());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| failed(e.to_string()))? {
            let remaining = PAGE_FETCH_MAX_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
            if body.len() >= PAGE_FETCH_MAX_BYTES {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
