//! Google Gemini `generateContent` client (chat and vision).

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::{ChatPrompt, ChatProvider, VisionProvider};
use crate::upstream::{ensure_success, Upstream};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    upstream: Upstream,
}

impl GeminiClient {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    async fn generate(&self, model: &str, body: Value) -> Result<String, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, "Calling generateContent");

        let response = self
            .upstream
            .post(&format!("models/{model}:generateContent"))
            .header("x-goog-api-key", self.upstream.api_key())
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let json: Value = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;

        json.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ProviderError::InvalidResponse("no candidate text in response".into()))
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let mut body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt.message}]}],
        });
        if let Some(system) = &prompt.system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        if let Some(max_tokens) = prompt.max_tokens {
            body["generationConfig"] = json!({"maxOutputTokens": max_tokens});
        }
        self.generate(model, body).await
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

#[async_trait]
impl VisionProvider for GeminiClient {
    async fn analyze(
        &self,
        model: &str,
        image: &[u8],
        mime: &str,
        question: &str,
    ) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": question},
                    {"inline_data": {"mime_type": mime, "data": BASE64.encode(image)}}
                ]
            }]
        });
        self.generate(model, body).await
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}
