//! `aiplex status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use aiplex_core::config::{load_config, ProvidersConfig};
use aiplex_core::utils::expand_home;
use aiplex_providers::registry::ProviderSpec;
use aiplex_providers::PROVIDERS;

use crate::helpers::{existence_mark, resolve_config_path};

/// Where a provider's key will come from at startup.
#[derive(Debug, PartialEq, Eq)]
enum KeySource {
    Config,
    Env,
    Missing,
}

fn key_source(spec: &ProviderSpec, providers: &ProvidersConfig) -> KeySource {
    if providers
        .get_by_name(spec.name)
        .is_some_and(|c| c.is_configured())
    {
        KeySource::Config
    } else if std::env::var(spec.env_key).is_ok_and(|v| !v.is_empty()) {
        KeySource::Env
    } else {
        KeySource::Missing
    }
}

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = resolve_config_path(config_path);

    println!();
    println!("{}", "◆ Aiplex Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        existence_mark(&path)
    );
    println!(
        "  {:<18} {}:{} {}",
        "Listen:".bold(),
        config.server.host,
        config.server.port,
        format!("(+{} fallback ports)", config.server.port_attempts.saturating_sub(1)).dimmed()
    );

    let public = expand_home(&config.server.public_dir);
    println!(
        "  {:<18} {} {}",
        "Static UI:".bold(),
        public.display(),
        existence_mark(&public)
    );
    let uploads = expand_home(&config.server.uploads_dir);
    println!(
        "  {:<18} {} {}",
        "Uploads:".bold(),
        uploads.display(),
        existence_mark(&uploads)
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let status = match key_source(spec, &config.providers) {
            KeySource::Config => format!("{} (key in config)", "✓".green()),
            KeySource::Env => format!("{} (key from {})", "✓".green(), spec.env_key),
            KeySource::Missing => format!("{}", "· not configured".dimmed()),
        };
        let base = config
            .providers
            .get_by_name(spec.name)
            .and_then(|c| c.api_base.as_deref())
            .unwrap_or(spec.default_api_base);
        println!(
            "    {:<14} {:<28} {}",
            spec.display_name,
            status,
            base.dimmed()
        );
    }

    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiplex_providers::registry::find_by_name;

    #[test]
    fn config_key_is_reported_first() {
        let mut providers = ProvidersConfig::default();
        providers.anthropic.api_key = "sk-ant".into();
        let spec = find_by_name("anthropic").unwrap();
        assert_eq!(key_source(spec, &providers), KeySource::Config);
    }

    #[test]
    fn unconfigured_provider_without_env() {
        let providers = ProvidersConfig::default();
        let spec = find_by_name("elevenlabs").unwrap();
        // The env var may be set on a developer machine
        let expected = if std::env::var(spec.env_key).is_ok_and(|v| !v.is_empty()) {
            KeySource::Env
        } else {
            KeySource::Missing
        };
        assert_eq!(key_source(spec, &providers), expected);
    }
}
