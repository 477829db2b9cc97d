//! Provider traits — one per task family.
//!
//! Each wire protocol (OpenAI-compatible, Anthropic, Gemini, HuggingFace,
//! ElevenLabs) implements the subset it supports. The factory in
//! `factory.rs` picks the implementation from the registry's `ApiStyle`.

use async_trait::async_trait;

use crate::error::ProviderError;

/// A single-turn chat request.
#[derive(Clone, Debug, Default)]
pub struct ChatPrompt {
    /// Optional system instruction.
    pub system: Option<String>,
    /// The user's message.
    pub message: String,
    /// Override for the protocol's default output limit.
    pub max_tokens: Option<u32>,
}

impl ChatPrompt {
    /// A prompt with just a user message.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach a system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Generated media: either a URL hosted by the provider, or raw bytes that
/// the server has to store and publish itself.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedMedia {
    Remote(String),
    Bytes { data: Vec<u8>, extension: String },
}

/// Text chat completion.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one prompt to `model` and return the reply text.
    async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

/// Question answering over a single image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Ask `question` about `image`. `mime` is the image's content type.
    async fn analyze(
        &self,
        model: &str,
        image: &[u8],
        mime: &str,
        question: &str,
    ) -> Result<String, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

/// Text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GeneratedMedia, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
