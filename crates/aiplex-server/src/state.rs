//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aiplex_core::config::{Config, ProvidersConfig};
use aiplex_core::utils::expand_home;
use aiplex_core::{KeyStore, ModelCatalog, UsageTracker};
use aiplex_providers::registry::{initial_keys, ProviderSpec};
use aiplex_providers::{build_http_client, ProviderError, Upstream};
use tracing::debug;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ModelCatalog>,
    pub keys: Arc<KeyStore>,
    pub usage: Arc<UsageTracker>,
    pub providers: Arc<ProvidersConfig>,
    pub http: reqwest::Client,
    pub uploads_dir: PathBuf,
    /// Largest remote audio file fetched for transcription.
    pub max_download_bytes: usize,
}

impl AppState {
    /// Build the startup state: seeded catalog and key store, empty usage.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = build_http_client(Duration::from_secs(config.server.request_timeout_secs))?;
        let keys = initial_keys(&config.providers);
        debug!(keys = keys.len(), "key store seeded");

        Ok(Self {
            catalog: Arc::new(ModelCatalog::from_config(&config.catalog)),
            keys: Arc::new(KeyStore::new(keys)),
            usage: Arc::new(UsageTracker::new()),
            providers: Arc::new(config.providers.clone()),
            http,
            uploads_dir: expand_home(&config.server.uploads_dir),
            max_download_bytes: config.server.max_upload_bytes,
        })
    }

    /// Connection details for `spec`, with the key looked up right now.
    pub async fn upstream(&self, spec: &'static ProviderSpec) -> Result<Upstream, ProviderError> {
        let api_key = self
            .keys
            .resolve(spec.key_id, spec.display_name)
            .await
            .ok_or_else(|| ProviderError::MissingApiKey(spec.display_name.to_string()))?;

        Ok(Upstream::new(
            self.http.clone(),
            spec,
            self.providers.get_by_name(spec.name),
            api_key,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiplex_core::NewApiKey;
    use aiplex_providers::registry::find_by_name;

    fn state_without_keys() -> AppState {
        let mut config = Config::default();
        config.server.uploads_dir = std::env::temp_dir().display().to_string();
        let state = AppState::new(&config).unwrap();
        AppState {
            keys: Arc::new(KeyStore::new(Vec::new())),
            ..state
        }
    }

    #[tokio::test]
    async fn test_upstream_requires_key() {
        let state = state_without_keys();
        let err = state
            .upstream(find_by_name("mistral").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No API key configured for Mistral AI");
    }

    #[tokio::test]
    async fn test_upstream_uses_posted_key() {
        let state = state_without_keys();
        state
            .keys
            .add(NewApiKey {
                name: "Mistral AI".into(),
                value: "m-live".into(),
            })
            .await;
        let upstream = state.upstream(find_by_name("mistral").unwrap()).await.unwrap();
        assert_eq!(upstream.api_key(), "m-live");
        assert_eq!(upstream.api_base(), "https://api.mistral.ai/v1");
    }

    #[tokio::test]
    async fn test_new_seeds_builtin_catalog() {
        let state = AppState::new(&Config::default()).unwrap();
        assert_eq!(state.catalog.len().await, 15);
        assert_eq!(state.keys.list().await.len(), 8);
        assert_eq!(state.usage.snapshot().await.total_calls, 0);
    }
}
