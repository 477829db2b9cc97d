//! ElevenLabs text-to-speech client.

use serde_json::json;
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::GeneratedMedia;
use crate::upstream::{ensure_success, Upstream};

const TTS_MODEL: &str = "eleven_multilingual_v2";

#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    upstream: Upstream,
}

impl ElevenLabsClient {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    /// Speak `text` with `voice_id`. Returns mp3 bytes.
    pub async fn text_to_speech(
        &self,
        voice_id: &str,
        text: &str,
    ) -> Result<GeneratedMedia, ProviderError> {
        let provider = self.upstream.display_name();
        debug!(provider, voice = voice_id, chars = text.len(), "Calling text-to-speech");

        let response = self
            .upstream
            .post(&format!("text-to-speech/{voice_id}"))
            .header("xi-api-key", self.upstream.api_key())
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&json!({"text": text, "model_id": TTS_MODEL}))
            .send()
            .await?;
        let response = ensure_success(response, provider).await?;
        let data = response.bytes().await?.to_vec();

        Ok(GeneratedMedia::Bytes {
            data,
            extension: "mp3".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use aiplex_core::config::ProviderConfig;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ElevenLabsClient {
        let config = ProviderConfig {
            api_key: String::new(),
            api_base: Some(server.uri()),
            extra_headers: None,
        };
        ElevenLabsClient::new(Upstream::new(
            reqwest::Client::new(),
            find_by_name("elevenlabs").unwrap(),
            Some(&config),
            "xi-test",
        ))
    }

    #[tokio::test]
    async fn test_text_to_speech() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
            .and(header("xi-api-key", "xi-test"))
            .and(body_partial_json(serde_json::json!({
                "text": "Hello world",
                "model_id": "eleven_multilingual_v2"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(b"ID3".to_vec()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let media = client_for(&mock_server)
            .text_to_speech("21m00Tcm4TlvDq8ikWAM", "Hello world")
            .await
            .unwrap();
        assert_eq!(
            media,
            GeneratedMedia::Bytes {
                data: b"ID3".to_vec(),
                extension: "mp3".into()
            }
        );
    }

    #[tokio::test]
    async fn test_quota_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice"))
            .respond_with(ResponseTemplate::new(401).set_body_string("quota_exceeded"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .text_to_speech("voice", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 401, .. }));
        assert_eq!(err.details(), "quota_exceeded");
    }
}
