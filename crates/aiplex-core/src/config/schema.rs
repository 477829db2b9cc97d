//! Configuration schema.
//!
//! Hierarchy: `Config` → `ServerConfig`, `ProvidersConfig`, `CatalogConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::ModelEntry;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.aiplex/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    pub catalog: CatalogConfig,
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// First port to try.
    pub port: u16,
    /// How many consecutive ports to try when the first one is busy.
    pub port_attempts: u16,
    /// Directory with the browser UI's static assets.
    pub public_dir: String,
    /// Directory where generated media is written and served from `/uploads`.
    pub uploads_dir: String,
    /// Timeout for a single upstream provider call, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum accepted request body (multipart uploads), in bytes. Also caps
    /// audio downloaded for transcription.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            port_attempts: 10,
            public_dir: "public".to_string(),
            uploads_dir: "uploads".to_string(),
            request_timeout_secs: 300,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations, keyed the same way as the provider registry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub mistral: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub google: ProviderConfig,
    #[serde(default)]
    pub huggingface: ProviderConfig,
    #[serde(default)]
    pub elevenlabs: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by registry name (e.g. `"google"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "anthropic" => Some(&self.anthropic),
            "mistral" => Some(&self.mistral),
            "groq" => Some(&self.groq),
            "google" => Some(&self.google),
            "huggingface" => Some(&self.huggingface),
            "elevenlabs" => Some(&self.elevenlabs),
            _ => None,
        }
    }

    /// Mutable variant of [`get_by_name`](Self::get_by_name).
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openai" => Some(&mut self.openai),
            "anthropic" => Some(&mut self.anthropic),
            "mistral" => Some(&mut self.mistral),
            "groq" => Some(&mut self.groq),
            "google" => Some(&mut self.google),
            "huggingface" => Some(&mut self.huggingface),
            "elevenlabs" => Some(&mut self.elevenlabs),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────

/// Model catalog configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    /// Start with the built-in model list.
    pub seed_builtin: bool,
    /// Additional entries appended after the built-ins.
    #[serde(default)]
    pub extra: Vec<ModelEntry>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_builtin: true,
            extra: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
