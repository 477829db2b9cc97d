//! Vision Q&A over an uploaded image (multipart form).

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, error};

use aiplex_core::ModelKind;
use aiplex_providers::registry::{find_by_name, resolve_upstream_model};
use aiplex_providers::vision_provider;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VisionResponse {
    pub result: String,
    pub cost: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/analyze-vision", post(analyze_vision))
}

#[derive(Default)]
struct VisionForm {
    image: Option<(Vec<u8>, String)>,
    question: String,
    model_id: String,
}

async fn read_form(mut multipart: Multipart) -> Result<VisionForm, ApiError> {
    let mut form = VisionForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !data.is_empty() {
                    form.image = Some((data.to_vec(), mime));
                }
            }
            "question" | "modelId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if name == "question" {
                    form.question = text;
                } else {
                    form.model_id = text;
                }
            }
            other => debug!(field = other, "ignoring multipart field"),
        }
    }
    Ok(form)
}

async fn analyze_vision(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VisionResponse>, ApiError> {
    let form = read_form(multipart).await?;

    let (image, mime) = form
        .image
        .ok_or_else(|| ApiError::bad_request("No image provided"))?;
    if form.question.trim().is_empty() {
        return Err(ApiError::bad_request("No question provided"));
    }

    let model = state
        .catalog
        .find_for(&form.model_id, ModelKind::Vision)
        .await
        .ok_or_else(|| ApiError::bad_request("Invalid model selected for vision analysis"))?;
    let spec = find_by_name(&model.provider)
        .filter(|s| s.supports(ModelKind::Vision))
        .ok_or_else(|| ApiError::not_implemented("Vision analysis not implemented for this provider"))?;

    let failed = format!("Failed to analyze image with {} API", spec.api_label);
    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(&failed, &e))?;
    let provider = vision_provider(upstream).map_err(|e| ApiError::upstream(&failed, &e))?;
    let upstream_model = resolve_upstream_model(&model, spec);

    debug!(provider = spec.name, model = %upstream_model, bytes = image.len(), "analyzing image");
    let result = provider
        .analyze(&upstream_model, &image, &mime, &form.question)
        .await
        .map_err(|e| {
            error!(provider = spec.name, error = %e, "vision analysis failed");
            ApiError::upstream(&failed, &e)
        })?;

    let cost = spec.cost(ModelKind::Vision).unwrap_or_default();
    state.usage.record(&model.name, cost).await;

    Ok(Json(VisionResponse { result, cost }))
}
