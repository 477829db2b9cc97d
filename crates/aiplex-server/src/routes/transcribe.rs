//! Speech-to-text for an uploaded file or a remote URL (multipart form).
//!
//! The audio is staged in a temp file that is removed when the handler
//! returns, successful or not.

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, error, info};

use aiplex_core::ModelKind;
use aiplex_providers::registry::{find_by_name, resolve_upstream_model};
use aiplex_providers::transcriber;
use aiplex_providers::transcription::media_extension;

use crate::error::ApiError;
use crate::state::AppState;

/// Extension used when neither the file name nor the URL reveals one.
const FALLBACK_EXTENSION: &str = "wav";

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
    pub cost: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/transcribe", post(transcribe))
}

enum AudioSource {
    Upload { data: Vec<u8>, file_name: String },
    Url(String),
}

#[derive(Default)]
struct TranscribeForm {
    model_id: String,
    file: Option<(Vec<u8>, String)>,
    url: Option<String>,
}

impl TranscribeForm {
    /// An uploaded file wins over a URL.
    fn source(self) -> Option<AudioSource> {
        if let Some((data, file_name)) = self.file {
            return Some(AudioSource::Upload { data, file_name });
        }
        self.url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(AudioSource::Url)
    }
}

async fn read_form(mut multipart: Multipart) -> Result<TranscribeForm, ApiError> {
    let mut form = TranscribeForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("audio").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !data.is_empty() {
                    form.file = Some((data.to_vec(), file_name));
                }
            }
            "url" | "modelId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if name == "url" {
                    form.url = Some(text);
                } else {
                    form.model_id = text;
                }
            }
            other => debug!(field = other, "ignoring multipart field"),
        }
    }
    Ok(form)
}

/// Fetch remote audio, giving up once it grows past `limit` bytes.
async fn download(http: &reqwest::Client, url: &str, limit: usize) -> Result<Vec<u8>, ApiError> {
    const FAILED: &str = "Failed to download audio";
    let too_large = || ApiError::internal(FAILED, format!("audio exceeds {limit} bytes"));

    info!(url = %url, "downloading audio");
    let mut response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ApiError::internal(FAILED, e))?;

    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large());
    }

    let mut data = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?
    {
        if data.len() + chunk.len() > limit {
            return Err(too_large());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Write the audio to a temp file named with a Whisper-friendly extension.
async fn stage(
    http: &reqwest::Client,
    source: AudioSource,
    limit: usize,
) -> Result<NamedTempFile, ApiError> {
    let (data, name) = match source {
        AudioSource::Upload { data, file_name } => (data, file_name),
        AudioSource::Url(url) => (download(http, &url, limit).await?, url),
    };

    let extension = media_extension(&name).unwrap_or(FALLBACK_EXTENSION);
    let staged = Builder::new()
        .prefix("aiplex-audio-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .map_err(|e| ApiError::internal("Failed to stage audio", e))?;
    tokio::fs::write(staged.path(), &data)
        .await
        .map_err(|e| ApiError::internal("Failed to stage audio", e))?;

    debug!(path = %staged.path().display(), bytes = data.len(), "audio staged");
    Ok(staged)
}

async fn transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let model_id = form.model_id.clone();
    let source = form
        .source()
        .ok_or_else(|| ApiError::bad_request("No file or URL provided"))?;

    let model = state
        .catalog
        .find_for(&model_id, ModelKind::Transcription)
        .await
        .ok_or_else(|| ApiError::bad_request("Invalid model selected for transcription"))?;
    let spec = find_by_name(&model.provider)
        .filter(|s| s.supports(ModelKind::Transcription))
        .ok_or_else(|| ApiError::not_implemented("Transcription not implemented for this provider"))?;

    let failed = format!("Failed to transcribe audio with {} API", spec.api_label);
    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(&failed, &e))?;
    let client = transcriber(upstream, resolve_upstream_model(&model, spec))
        .map_err(|e| ApiError::upstream(&failed, &e))?;

    // Dropping `staged` deletes the file on every path below
    let staged = stage(&state.http, source, state.max_download_bytes).await?;
    let transcription = client.transcribe(staged.path()).await.map_err(|e| {
        error!(provider = spec.name, error = %e, "transcription failed");
        ApiError::upstream(&failed, &e)
    })?;

    let cost = spec.cost(ModelKind::Transcription).unwrap_or_default();
    state.usage.record(&model.name, cost).await;
    info!(model = %model.name, chars = transcription.len(), "transcription complete");

    Ok(Json(TranscriptionResponse {
        transcription,
        cost,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_wins_over_url() {
        let form = TranscribeForm {
            model_id: "whisper-1".into(),
            file: Some((vec![1], "a.mp3".into())),
            url: Some("https://example.com/b.wav".into()),
        };
        assert!(matches!(form.source(), Some(AudioSource::Upload { .. })));
    }

    #[test]
    fn test_blank_url_is_no_source() {
        let form = TranscribeForm {
            url: Some("   ".into()),
            ..Default::default()
        };
        assert!(form.source().is_none());
    }

    #[tokio::test]
    async fn test_stage_uses_known_extension() {
        let staged = stage(
            &reqwest::Client::new(),
            AudioSource::Upload {
                data: b"OggS".to_vec(),
                file_name: "memo.ogg".into(),
            },
            1024,
        )
        .await
        .unwrap();
        assert!(staged.path().to_string_lossy().ends_with(".ogg"));
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"OggS");

        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_stage_falls_back_to_wav() {
        let staged = stage(
            &reqwest::Client::new(),
            AudioSource::Upload {
                data: vec![0],
                file_name: "blob".into(),
            },
            1024,
        )
        .await
        .unwrap();
        assert!(staged.path().to_string_lossy().ends_with(".wav"));
    }

    #[tokio::test]
    async fn test_download_rejects_oversized_audio() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/long.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let url = format!("{}/long.mp3", server.uri());
        let http = reqwest::Client::new();

        let err = download(&http, &url, 16).await.unwrap_err();
        match err {
            ApiError::Internal { message, details } => {
                assert_eq!(message, "Failed to download audio");
                assert_eq!(details, "audio exceeds 16 bytes");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let data = download(&http, &url, 64).await.unwrap();
        assert_eq!(data.len(), 64);
    }
}
