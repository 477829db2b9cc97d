//! Client for OpenAI-compatible APIs (OpenAI, Groq, Mistral).
//!
//! Chat and vision go through `/chat/completions`, image generation through
//! `/images/generations`. Authentication is a Bearer token.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::{ChatPrompt, ChatProvider, GeneratedMedia, ImageGenerator, VisionProvider};
use crate::upstream::{ensure_success, Upstream};

/// Output limit used when the prompt carries none.
const DEFAULT_MAX_TOKENS: u32 = 300;

/// Reply text used when the provider returns no content.
pub const EMPTY_REPLY: &str = "No response generated";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

// ─────────────────────────────────────────────
// OpenAiCompatClient
// ─────────────────────────────────────────────

/// Client for any provider speaking the OpenAI REST dialect.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    upstream: Upstream,
}

impl OpenAiCompatClient {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    /// POST a completion request and extract the first choice's text.
    async fn complete(
        &self,
        model: &str,
        messages: Vec<Value>,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, messages = messages.len(), "Calling chat completions");

        let body = ChatCompletionRequest {
            model,
            messages,
            max_tokens,
        };

        let response = self
            .upstream
            .post("chat/completions")
            .bearer_auth(self.upstream.api_key())
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        debug!(provider, chars = content.len(), "chat response received");
        Ok(content)
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatClient {
    async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt.message}));

        self.complete(
            model,
            messages,
            prompt.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        )
        .await
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

#[async_trait]
impl VisionProvider for OpenAiCompatClient {
    async fn analyze(
        &self,
        model: &str,
        image: &[u8],
        mime: &str,
        question: &str,
    ) -> Result<String, ProviderError> {
        let data_uri = format!("data:{};base64,{}", mime, BASE64.encode(image));
        let messages = vec![json!({
            "role": "user",
            "content": [
                {"type": "text", "text": question},
                {"type": "image_url", "image_url": {"url": data_uri}}
            ]
        })];
        self.complete(model, messages, DEFAULT_MAX_TOKENS).await
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

#[async_trait]
impl ImageGenerator for OpenAiCompatClient {
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GeneratedMedia, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, "Calling image generations");

        let response = self
            .upstream
            .post("images/generations")
            .bearer_auth(self.upstream.api_key())
            .json(&json!({
                "model": model,
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
            }))
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let parsed: ImageGenerationResponse = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .map(GeneratedMedia::Remote)
            .ok_or_else(|| ProviderError::InvalidResponse("no image url in response".into()))
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
