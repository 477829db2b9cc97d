//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::{ChatPrompt, ChatProvider};
use crate::upstream::{ensure_success, Upstream};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Chat via `POST {base}/messages` with `x-api-key` authentication.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    upstream: Upstream,
}

impl AnthropicClient {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl ChatProvider for AnthropicClient {
    async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, "Calling messages API");

        let mut body = json!({
            "model": model,
            "max_tokens": prompt.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{"role": "user", "content": prompt.message}],
        });
        if let Some(system) = &prompt.system {
            body["system"] = json!(system);
        }

        let response = self
            .upstream
            .post("messages")
            .header("x-api-key", self.upstream.api_key())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("no text block in response".into()))
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}
