//! Connection details for one provider call.
//!
//! An `Upstream` bundles the shared HTTP client with the base URL, key and
//! extra headers of a single provider. It is built per request, so key
//! changes made through the key store apply immediately.

use std::time::Duration;

use aiplex_core::config::ProviderConfig;
use aiplex_core::utils::truncate_string;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{error, warn};

use crate::error::ProviderError;
use crate::registry::ProviderSpec;

/// Build the shared, connection-pooled HTTP client.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Everything needed to reach one provider.
#[derive(Clone)]
pub struct Upstream {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    extra_headers: HeaderMap,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upstream")
            .field("provider", &self.spec.display_name)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Upstream {
    /// Create an upstream for `spec`.
    ///
    /// API base: config `apiBase` > registry default.
    pub fn new(
        client: reqwest::Client,
        spec: &'static ProviderSpec,
        config: Option<&ProviderConfig>,
        api_key: impl Into<String>,
    ) -> Self {
        let api_base = config
            .and_then(|c| c.api_base.clone())
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(headers) = config.and_then(|c| c.extra_headers.as_ref()) {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        Self {
            client,
            api_base,
            api_key: api_key.into(),
            extra_headers,
            spec,
        }
    }

    /// Full URL for `path` below the API base.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST builder for `path` with the extra headers applied.
    ///
    /// Authentication is left to the caller since every provider does it
    /// differently.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .headers(self.extra_headers.clone())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn spec(&self) -> &'static ProviderSpec {
        self.spec
    }

    pub fn display_name(&self) -> &'static str {
        self.spec.display_name
    }
}

/// Pass a successful response through; turn anything else into
/// [`ProviderError::Api`] carrying the upstream body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    provider: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    error!(
        provider,
        status = %status,
        body = %truncate_string(&body, 500),
        "API error"
    );
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use std::collections::HashMap;

    fn make_config(api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: String::new(),
            api_base: api_base.map(String::from),
            extra_headers: None,
        }
    }

    #[test]
    fn test_url_trailing_slash() {
        let spec = find_by_name("openai").unwrap();
        let config = make_config(Some("https://api.openai.com/v1/"));
        let upstream = Upstream::new(reqwest::Client::new(), spec, Some(&config), "k");
        assert_eq!(
            upstream.url("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base() {
        let spec = find_by_name("anthropic").unwrap();
        let upstream = Upstream::new(reqwest::Client::new(), spec, None, "k");
        assert_eq!(upstream.api_base(), "https://api.anthropic.com/v1");
        assert_eq!(upstream.url("messages"), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_config_overrides_default_base() {
        let spec = find_by_name("groq").unwrap();
        let config = make_config(Some("http://127.0.0.1:9999"));
        let upstream = Upstream::new(reqwest::Client::new(), spec, Some(&config), "k");
        assert_eq!(upstream.api_base(), "http://127.0.0.1:9999");
        assert_eq!(upstream.display_name(), "Groq");
    }

    #[test]
    fn test_blank_base_is_ignored() {
        let spec = find_by_name("mistral").unwrap();
        let config = make_config(Some("  "));
        let upstream = Upstream::new(reqwest::Client::new(), spec, Some(&config), "k");
        assert_eq!(upstream.api_base(), "https://api.mistral.ai/v1");
    }

    #[test]
    fn test_extra_headers() {
        let spec = find_by_name("openai").unwrap();
        let mut headers = HashMap::new();
        headers.insert("OpenAI-Organization".to_string(), "org-123".to_string());
        headers.insert("bad header".to_string(), "x".to_string());
        let config = ProviderConfig {
            api_key: String::new(),
            api_base: None,
            extra_headers: Some(headers),
        };
        let upstream = Upstream::new(reqwest::Client::new(), spec, Some(&config), "k");
        assert!(upstream.extra_headers.contains_key("openai-organization"));
        assert_eq!(upstream.extra_headers.len(), 1);
    }
}
