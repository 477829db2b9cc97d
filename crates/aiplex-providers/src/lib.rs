//! Provider layer for Aiplex.
//!
//! Direct HTTP clients for every supported AI provider.
//!
//! # Architecture
//!
//! - [`registry`] — static specs for the 7 supported providers + matching logic
//! - [`upstream::Upstream`] — shared client, base URL, key and headers for one call
//! - [`traits`] — task traits (`ChatProvider`, `VisionProvider`, `ImageGenerator`)
//! - one module per wire protocol: [`openai_compat`], [`anthropic`], [`gemini`],
//!   [`huggingface`], [`elevenlabs`], plus [`transcription`] for Whisper
//! - [`factory`] — picks the implementation for a provider spec

pub mod anthropic;
pub mod elevenlabs;
pub mod error;
pub mod factory;
pub mod gemini;
pub mod huggingface;
pub mod openai_compat;
pub mod registry;
pub mod traits;
pub mod transcription;
pub mod upstream;

pub use anthropic::AnthropicClient;
pub use elevenlabs::ElevenLabsClient;
pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;
pub use openai_compat::OpenAiCompatClient;

// Re-export main types for convenience
pub use error::ProviderError;
pub use factory::{chat_provider, image_generator, transcriber, vision_provider};
pub use registry::{ApiStyle, ProviderSpec, FALLBACK_CHAT_COST, PROVIDERS};
pub use traits::{ChatPrompt, ChatProvider, GeneratedMedia, ImageGenerator, VisionProvider};
pub use transcription::{TranscriptionProvider, WhisperTranscriber};
pub use upstream::{build_http_client, Upstream};
