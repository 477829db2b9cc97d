//! `aiplex models` — print the catalog the server starts with.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use aiplex_core::config::load_config;
use aiplex_core::ModelEntry;
use aiplex_providers::registry::find_by_name;

/// Startup catalog: built-ins (unless disabled) followed by configured extras.
fn startup_models(config_path: Option<&Path>) -> Vec<ModelEntry> {
    let config = load_config(config_path);
    let mut models = if config.catalog.seed_builtin {
        aiplex_core::catalog::builtin_models()
    } else {
        Vec::new()
    };
    models.extend(config.catalog.extra);
    models
}

/// One table row: provider display name and per-call cost, if known.
fn describe(entry: &ModelEntry) -> (String, String) {
    match find_by_name(&entry.provider) {
        Some(spec) => (
            spec.display_name.to_string(),
            spec.cost(entry.kind)
                .map(|c| format!("${c}"))
                .unwrap_or_else(|| "unsupported".to_string()),
        ),
        None => (entry.provider.clone(), "-".to_string()),
    }
}

pub fn run(config_path: Option<&Path>, json: bool) -> Result<()> {
    let models = startup_models(config_path);

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    println!();
    println!(
        "  {:<46} {:<24} {:<14} {:<12} {}",
        "ID".bold(),
        "Name".bold(),
        "Type".bold(),
        "Provider".bold(),
        "Cost".bold()
    );
    for entry in &models {
        let (provider, cost) = describe(entry);
        println!(
            "  {:<46} {:<24} {:<14} {:<12} {}",
            entry.id,
            entry.name,
            entry.kind.to_string(),
            provider,
            cost.dimmed()
        );
    }
    println!();
    println!("  {} models", models.len());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiplex_core::ModelKind;

    #[test]
    fn describe_known_provider() {
        let entry = ModelEntry::new("hf-flux", "Hugging Face FLUX", ModelKind::Image, "huggingface");
        assert_eq!(describe(&entry), ("HuggingFace".to_string(), "$0.05".to_string()));
    }

    #[test]
    fn describe_unsupported_task_and_unknown_provider() {
        let entry = ModelEntry::new("x", "X", ModelKind::Video, "openai");
        assert_eq!(describe(&entry).1, "unsupported");

        let entry = ModelEntry::new("y", "Y", ModelKind::Text, "cohere");
        assert_eq!(describe(&entry), ("cohere".to_string(), "-".to_string()));
    }

    #[test]
    fn startup_models_from_missing_file_are_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let models = startup_models(Some(&dir.path().join("missing.json")));
        assert_eq!(models.len(), 15);
    }
}
