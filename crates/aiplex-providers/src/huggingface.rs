//! HuggingFace serverless inference client.
//!
//! Every task posts to `{base}/models/{model}`; the task is implied by the
//! model. Generation endpoints answer with raw media bytes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::{GeneratedMedia, ImageGenerator, VisionProvider};
use crate::upstream::{ensure_success, Upstream};

#[derive(Debug, Deserialize)]
struct Caption {
    generated_text: String,
}

#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    upstream: Upstream,
}

impl HuggingFaceClient {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    fn model_path(model: &str) -> String {
        format!("models/{model}")
    }

    /// Animate a still image. `image_data` is passed through as sent by the
    /// browser (usually a data URI).
    pub async fn image_to_video(
        &self,
        model: &str,
        image_data: &str,
        prompt: &str,
    ) -> Result<GeneratedMedia, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, "Calling image-to-video inference");

        let response = self
            .upstream
            .post(&Self::model_path(model))
            .bearer_auth(self.upstream.api_key())
            .json(&json!({
                "inputs": image_data,
                "parameters": {
                    "prompt": prompt,
                    "num_inference_steps": 50,
                    "num_frames": 16,
                    "height": 320,
                    "width": 576,
                }
            }))
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;
        let data = response.bytes().await?.to_vec();

        debug!(provider, bytes = data.len(), "video received");
        Ok(GeneratedMedia::Bytes {
            data,
            extension: "mp4".into(),
        })
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceClient {
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GeneratedMedia, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, "Calling text-to-image inference");

        let response = self
            .upstream
            .post(&Self::model_path(model))
            .bearer_auth(self.upstream.api_key())
            .json(&json!({
                "inputs": prompt,
                "parameters": {
                    "guidance_scale": 7.5,
                    "num_inference_steps": 50,
                    "width": 768,
                    "height": 768,
                }
            }))
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;
        let data = response.bytes().await?.to_vec();

        debug!(provider, bytes = data.len(), "image received");
        Ok(GeneratedMedia::Bytes {
            data,
            extension: "png".into(),
        })
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

#[async_trait]
impl VisionProvider for HuggingFaceClient {
    /// Captioning models take no question; the caption is the answer.
    async fn analyze(
        &self,
        model: &str,
        image: &[u8],
        mime: &str,
        _question: &str,
    ) -> Result<String, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, model, bytes = image.len(), "Calling image captioning");

        let response = self
            .upstream
            .post(&Self::model_path(model))
            .bearer_auth(self.upstream.api_key())
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(image.to_vec())
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;

        let captions: Vec<Caption> = response
            .json()
            .await
            .map_err(ProviderError::invalid_body)?;

        captions
            .into_iter()
            .next()
            .map(|c| c.generated_text)
            .ok_or_else(|| ProviderError::InvalidResponse("empty caption list".into()))
    }

    fn display_name(&self) -> &str {
        self.upstream.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use aiplex_core::config::ProviderConfig;
    use wiremock::matchers::{body_bytes, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HuggingFaceClient {
        let config = ProviderConfig {
            api_key: String::new(),
            api_base: Some(server.uri()),
            extra_headers: None,
        };
        HuggingFaceClient::new(Upstream::new(
            reqwest::Client::new(),
            find_by_name("huggingface").unwrap(),
            Some(&config),
            "hf_test",
        ))
    }

    #[tokio::test]
    async fn test_text_to_image_returns_png_bytes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/FLUX.1-dev"))
            .and(header("Authorization", "Bearer hf_test"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "a lighthouse",
                "parameters": {"width": 768, "height": 768, "num_inference_steps": 50}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let media = client_for(&mock_server)
            .generate_image("black-forest-labs/FLUX.1-dev", "a lighthouse")
            .await
            .unwrap();
        assert_eq!(
            media,
            GeneratedMedia::Bytes {
                data: vec![0x89, b'P', b'N', b'G'],
                extension: "png".into()
            }
        );
    }

    #[tokio::test]
    async fn test_image_to_video() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/stabilityai/stable-video-diffusion-img2vid-xt"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "data:image/png;base64,AAAA",
                "parameters": {"prompt": "pan left", "num_frames": 16, "height": 320, "width": 576}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4data".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let media = client_for(&mock_server)
            .image_to_video(
                "stabilityai/stable-video-diffusion-img2vid-xt",
                "data:image/png;base64,AAAA",
                "pan left",
            )
            .await
            .unwrap();
        match media {
            GeneratedMedia::Bytes { data, extension } => {
                assert_eq!(data, b"mp4data");
                assert_eq!(extension, "mp4");
            }
            other => panic!("unexpected media: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_model_loading_error_keeps_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/stabilityai/stable-video-diffusion-img2vid-xt"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_string(r#"{"error":"Model is currently loading","estimated_time":20.0}"#),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .image_to_video("stabilityai/stable-video-diffusion-img2vid-xt", "x", "p")
            .await
            .unwrap_err();
        assert!(err.details().contains("Model is currently loading"));
    }

    #[tokio::test]
    async fn test_captioning_sends_raw_bytes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/Salesforce/blip-image-captioning-large"))
            .and(header("content-type", "image/jpeg"))
            .and(body_bytes(vec![1u8, 2, 3]))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "a dog on a beach"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let caption = client_for(&mock_server)
            .analyze(
                "Salesforce/blip-image-captioning-large",
                &[1, 2, 3],
                "image/jpeg",
                "What is in the picture?",
            )
            .await
            .unwrap();
        assert_eq!(caption, "a dog on a beach");
    }

    #[tokio::test]
    async fn test_captioning_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/Salesforce/blip-image-captioning-large"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .analyze("Salesforce/blip-image-captioning-large", &[1], "image/png", "q")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
