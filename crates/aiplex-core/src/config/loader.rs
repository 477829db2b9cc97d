//! Config loader — reads `~/.aiplex/config.json` and merges `.env` and env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.aiplex/config.json`
//! 3. `.env` in the working directory (only fills variables not already set)
//! 4. Environment variables `AIPLEX_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Provider names accepted in `AIPLEX_PROVIDERS__<NAME>__*` variables.
const PROVIDER_NAMES: &[&str] = &[
    "openai",
    "anthropic",
    "mistral",
    "groq",
    "google",
    "huggingface",
    "elevenlabs",
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + `.env` + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    match dotenvy::dotenv() {
        Ok(env_path) => debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to read .env file: {}", e),
    }

    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `AIPLEX_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PORT` → `server.port` (plain-port convention of hosting platforms)
/// - `AIPLEX_SERVER__HOST` → `server.host`
/// - `AIPLEX_SERVER__PORT` → `server.port` (wins over `PORT`)
/// - `AIPLEX_SERVER__PUBLIC_DIR` → `server.public_dir`
/// - `AIPLEX_SERVER__UPLOADS_DIR` → `server.uploads_dir`
/// - `AIPLEX_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `AIPLEX_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.server.port = p;
        }
    }
    if let Ok(val) = std::env::var("AIPLEX_SERVER__HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("AIPLEX_SERVER__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.server.port = p;
        }
    }
    if let Ok(val) = std::env::var("AIPLEX_SERVER__PUBLIC_DIR") {
        config.server.public_dir = val;
    }
    if let Ok(val) = std::env::var("AIPLEX_SERVER__UPLOADS_DIR") {
        config.server.uploads_dir = val;
    }

    for name in PROVIDER_NAMES {
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            apply_provider_env(provider, &name.to_uppercase());
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("AIPLEX_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("AIPLEX_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
