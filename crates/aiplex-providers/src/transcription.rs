//! Speech-to-text via Whisper-style `/audio/transcriptions` endpoints.
//!
//! OpenAI and Groq both expose the same multipart API, so one client covers
//! both; only the upstream (base URL, key) and the model differ.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::upstream::{ensure_success, Upstream};

// ─────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────

/// Trait for speech-to-text transcription providers.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe an audio file to text.
    async fn transcribe(&self, file_path: &Path) -> Result<String, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

// ─────────────────────────────────────────────
// Whisper
// ─────────────────────────────────────────────

/// Whisper transcription against an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    upstream: Upstream,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(upstream: Upstream, model: impl Into<String>) -> Self {
        Self {
            upstream,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperTranscriber {
    async fn transcribe(&self, file_path: &Path) -> Result<String, ProviderError> {
        let provider = self.upstream.display_name();

        if !file_path.exists() {
            warn!(path = %file_path.display(), "transcription: file not found");
            return Err(ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("audio file not found: {}", file_path.display()),
            )));
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        debug!(
            provider,
            path = %file_path.display(),
            model = %self.model,
            "transcribing audio"
        );

        let file_bytes = tokio::fs::read(file_path).await?;

        let file_part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());

        let response = self
            .upstream
            .post("audio/transcriptions")
            .bearer_auth(self.upstream.api_key())
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;
        let text = json["text"]
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse("no text in response".into()))?
            .to_string();

        debug!(provider, chars = text.len(), "transcription complete");

        Ok(text)
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

// ─────────────────────────────────────────────
// Helper
// ─────────────────────────────────────────────

/// Extension of a file name or URL path if it looks like audio/video that
/// Whisper accepts.
pub fn media_extension(name: &str) -> Option<&'static str> {
    const KNOWN: &[&str] = &[
        "ogg", "oga", "opus", "mp3", "m4a", "wav", "flac", "aac", "webm", "mp4", "mpeg", "mpga",
    ];
    let lower = name
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let ext = lower.rsplit_once('.')?.1;
    KNOWN.iter().copied().find(|k| *k == ext)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
