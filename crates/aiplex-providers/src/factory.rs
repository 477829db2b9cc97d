//! Pick the client implementation for a provider and task.
//!
//! Support is decided by the registry's cost table: a task without a cost is
//! not implemented for that provider, whatever its wire protocol could do.

use aiplex_core::ModelKind;

use crate::anthropic::AnthropicClient;
use crate::error::ProviderError;
use crate::gemini::GeminiClient;
use crate::huggingface::HuggingFaceClient;
use crate::openai_compat::OpenAiCompatClient;
use crate::registry::ApiStyle;
use crate::traits::{ChatProvider, ImageGenerator, VisionProvider};
use crate::transcription::{TranscriptionProvider, WhisperTranscriber};
use crate::upstream::Upstream;

fn unsupported(upstream: &Upstream, task: ModelKind) -> ProviderError {
    ProviderError::Unsupported {
        provider: upstream.display_name().to_string(),
        task,
    }
}

fn ensure_supported(upstream: &Upstream, task: ModelKind) -> Result<(), ProviderError> {
    if upstream.spec().supports(task) {
        Ok(())
    } else {
        Err(unsupported(upstream, task))
    }
}

/// Chat client for the upstream's provider.
pub fn chat_provider(upstream: Upstream) -> Result<Box<dyn ChatProvider>, ProviderError> {
    ensure_supported(&upstream, ModelKind::Text)?;
    match upstream.spec().api_style {
        ApiStyle::OpenAiCompatible => Ok(Box::new(OpenAiCompatClient::new(upstream))),
        ApiStyle::Anthropic => Ok(Box::new(AnthropicClient::new(upstream))),
        ApiStyle::Gemini => Ok(Box::new(GeminiClient::new(upstream))),
        ApiStyle::HuggingFace | ApiStyle::ElevenLabs => {
            Err(unsupported(&upstream, ModelKind::Text))
        }
    }
}

/// Image generator for the upstream's provider.
pub fn image_generator(upstream: Upstream) -> Result<Box<dyn ImageGenerator>, ProviderError> {
    ensure_supported(&upstream, ModelKind::Image)?;
    match upstream.spec().api_style {
        ApiStyle::OpenAiCompatible => Ok(Box::new(OpenAiCompatClient::new(upstream))),
        ApiStyle::HuggingFace => Ok(Box::new(HuggingFaceClient::new(upstream))),
        _ => Err(unsupported(&upstream, ModelKind::Image)),
    }
}

/// Vision client for the upstream's provider.
pub fn vision_provider(upstream: Upstream) -> Result<Box<dyn VisionProvider>, ProviderError> {
    ensure_supported(&upstream, ModelKind::Vision)?;
    match upstream.spec().api_style {
        ApiStyle::OpenAiCompatible => Ok(Box::new(OpenAiCompatClient::new(upstream))),
        ApiStyle::Gemini => Ok(Box::new(GeminiClient::new(upstream))),
        ApiStyle::HuggingFace => Ok(Box::new(HuggingFaceClient::new(upstream))),
        _ => Err(unsupported(&upstream, ModelKind::Vision)),
    }
}

/// Transcriber for the upstream's provider, bound to `model`.
pub fn transcriber(
    upstream: Upstream,
    model: impl Into<String>,
) -> Result<Box<dyn TranscriptionProvider>, ProviderError> {
    ensure_supported(&upstream, ModelKind::Transcription)?;
    match upstream.spec().api_style {
        ApiStyle::OpenAiCompatible => Ok(Box::new(WhisperTranscriber::new(upstream, model))),
        _ => Err(unsupported(&upstream, ModelKind::Transcription)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;

    fn upstream(provider: &str) -> Upstream {
        Upstream::new(
            reqwest::Client::new(),
            find_by_name(provider).unwrap(),
            None,
            "key",
        )
    }

    #[test]
    fn test_chat_providers() {
        for name in ["groq", "openai", "mistral", "anthropic", "google"] {
            let provider = chat_provider(upstream(name)).unwrap();
            assert_eq!(provider.display_name(), find_by_name(name).unwrap().display_name);
        }
        let err = chat_provider(upstream("elevenlabs")).err().unwrap();
        assert_eq!(err.to_string(), "ElevenLabs does not support text");
    }

    #[test]
    fn test_image_generators() {
        assert!(image_generator(upstream("openai")).is_ok());
        assert!(image_generator(upstream("huggingface")).is_ok());
        // OpenAI-compatible, but no image endpoint
        assert!(image_generator(upstream("groq")).is_err());
        assert!(image_generator(upstream("google")).is_err());
    }

    #[test]
    fn test_vision_providers() {
        assert!(vision_provider(upstream("openai")).is_ok());
        assert!(vision_provider(upstream("google")).is_ok());
        assert!(vision_provider(upstream("huggingface")).is_ok());
        assert!(vision_provider(upstream("anthropic")).is_err());
    }

    #[test]
    fn test_transcribers() {
        assert!(transcriber(upstream("openai"), "whisper-1").is_ok());
        assert!(transcriber(upstream("groq"), "whisper-large-v3").is_ok());
        assert!(matches!(
            transcriber(upstream("mistral"), "x").err().unwrap(),
            ProviderError::Unsupported { .. }
        ));
    }
}
