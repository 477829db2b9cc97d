//! Media generation: image, video and audio.
//!
//! Each handler resolves a catalog entry of the matching type, checks the
//! provider implements the task, makes one upstream call and publishes the
//! result as a URL.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use aiplex_core::{ModelEntry, ModelKind};
use aiplex_providers::registry::{find_by_name, resolve_upstream_model, ApiStyle, ProviderSpec};
use aiplex_providers::{image_generator, ElevenLabsClient, HuggingFaceClient};

use crate::error::ApiError;
use crate::media::publish;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model_id: String,
    /// Source frame for image-to-video, usually a data URI.
    #[serde(default)]
    pub image_data: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub video_url: String,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResponse {
    pub audio_url: String,
    pub cost: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/generate-image", post(generate_image))
        .route("/api/generate-video", post(generate_video))
        .route("/api/generate-audio", post(generate_audio))
}

/// Catalog entry of `kind` plus its provider, or the task's 400/501.
async fn resolve_task(
    state: &AppState,
    model_id: &str,
    kind: ModelKind,
    invalid: &str,
    unsupported: &str,
) -> Result<(ModelEntry, &'static ProviderSpec), ApiError> {
    let model = state
        .catalog
        .find_for(model_id, kind)
        .await
        .ok_or_else(|| ApiError::bad_request(invalid))?;
    let spec = find_by_name(&model.provider)
        .filter(|s| s.supports(kind))
        .ok_or_else(|| ApiError::not_implemented(unsupported))?;
    Ok((model, spec))
}

// ─────────────────────────────────────────────
// Image
// ─────────────────────────────────────────────

async fn generate_image(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let (model, spec) = resolve_task(
        &state,
        &req.model_id,
        ModelKind::Image,
        "Invalid model selected for image generation",
        "Image generation not implemented for this provider",
    )
    .await?;

    let failed = format!("Failed to generate image with {} API", spec.api_label);
    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(&failed, &e))?;
    let generator = image_generator(upstream).map_err(|e| ApiError::upstream(&failed, &e))?;
    let upstream_model = resolve_upstream_model(&model, spec);

    info!(provider = spec.name, model = %upstream_model, "generating image");
    let media = generator
        .generate_image(&upstream_model, &req.prompt)
        .await
        .map_err(|e| {
            error!(provider = spec.name, error = %e, "image generation failed");
            ApiError::upstream(&failed, &e)
        })?;
    let image_url = publish(&state.uploads_dir, media)
        .await
        .map_err(|e| ApiError::internal(&failed, e))?;

    let cost = spec.cost(ModelKind::Image).unwrap_or_default();
    state.usage.record(&model.name, cost).await;

    Ok(Json(ImageResponse { image_url, cost }))
}

// ─────────────────────────────────────────────
// Video
// ─────────────────────────────────────────────

async fn generate_video(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<VideoResponse>, ApiError> {
    const FAILED: &str = "Failed to generate video with Hugging Face API";

    let (model, spec) = resolve_task(
        &state,
        &req.model_id,
        ModelKind::Video,
        "Invalid model selected for video generation",
        "Video generation not implemented for this provider",
    )
    .await?;
    if spec.api_style != ApiStyle::HuggingFace {
        return Err(ApiError::not_implemented(
            "Video generation not implemented for this provider",
        ));
    }

    let image_data = req
        .image_data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::not_implemented("Text to Video generation is not yet implemented"))?;

    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(FAILED, &e))?;
    let upstream_model = resolve_upstream_model(&model, spec);

    info!(provider = spec.name, model = %upstream_model, "generating video");
    let media = HuggingFaceClient::new(upstream)
        .image_to_video(&upstream_model, &image_data, &req.prompt)
        .await
        .map_err(|e| {
            error!(provider = spec.name, error = %e, "video generation failed");
            ApiError::upstream(FAILED, &e)
        })?;
    let video_url = publish(&state.uploads_dir, media)
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?;

    let cost = spec.cost(ModelKind::Video).unwrap_or_default();
    state.usage.record(&model.name, cost).await;

    Ok(Json(VideoResponse { video_url, cost }))
}

// ─────────────────────────────────────────────
// Audio
// ─────────────────────────────────────────────

async fn generate_audio(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<AudioResponse>, ApiError> {
    let (model, spec) = resolve_task(
        &state,
        &req.model_id,
        ModelKind::Audio,
        "Invalid model selected for audio generation",
        "Audio generation not implemented for this provider",
    )
    .await?;
    if spec.api_style != ApiStyle::ElevenLabs {
        return Err(ApiError::not_implemented(
            "Audio generation not implemented for this provider",
        ));
    }

    let failed = format!("Failed to generate audio with {} API", spec.api_label);
    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(&failed, &e))?;
    let voice = resolve_upstream_model(&model, spec);

    info!(provider = spec.name, voice = %voice, "generating audio");
    let media = ElevenLabsClient::new(upstream)
        .text_to_speech(&voice, &req.prompt)
        .await
        .map_err(|e| {
            error!(provider = spec.name, error = %e, "audio generation failed");
            ApiError::upstream(&failed, &e)
        })?;
    let audio_url = publish(&state.uploads_dir, media)
        .await
        .map_err(|e| ApiError::internal(&failed, e))?;

    let cost = spec.cost(ModelKind::Audio).unwrap_or_default();
    state.usage.record(&model.name, cost).await;

    Ok(Json(AudioResponse { audio_url, cost }))
}
