//! `aiplex onboard` — initialize configuration and served directories.
//!
//! - Creates `~/.aiplex/config.json` with defaults
//! - Creates the uploads directory and a static UI directory with a
//!   placeholder page

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use aiplex_core::config::{load_config, save_config};
use aiplex_core::utils::expand_home;

use crate::helpers::resolve_config_path;

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "◆ Aiplex — Setup".cyan().bold());
    println!();

    let path = resolve_config_path(config_path);

    // 1. Create config if it doesn't exist
    if path.exists() {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    } else {
        let config = load_config(Some(&path)); // defaults + env
        save_config(&config, Some(&path))
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        println!("  {} created config at {}", "✓".green(), path.display());
    }

    let config = load_config(Some(&path));

    // 2. Uploads directory
    let uploads = expand_home(&config.server.uploads_dir);
    std::fs::create_dir_all(&uploads)
        .with_context(|| format!("failed to create uploads dir: {}", uploads.display()))?;
    println!("  {} uploads at {}", "✓".green(), uploads.display());

    // 3. Static UI directory
    let public = expand_home(&config.server.public_dir);
    std::fs::create_dir_all(&public)
        .with_context(|| format!("failed to create static dir: {}", public.display()))?;
    create_template(&public.join("index.html"), INDEX_TEMPLATE)?;

    println!();
    println!(
        "{}",
        "  Setup complete! Add API keys to the config or environment, then run `aiplex serve`."
            .green()
    );
    println!();

    Ok(())
}

/// Create a template file if it doesn't exist.
fn create_template(path: &Path, content: &str) -> Result<()> {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    if path.exists() {
        println!("  {} {} already exists", "✓".green(), name);
    } else {
        std::fs::write(path, content)?;
        println!("  {} created {}", "✓".green(), name);
    }
    Ok(())
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Aiplex</title>
</head>
<body>
  <h1>Aiplex</h1>
  <p>The API is running. Put the browser UI's assets in this directory.</p>
  <ul>
    <li><a href="/api/models">/api/models</a></li>
    <li><a href="/api/usage-stats">/api/usage-stats</a></li>
    <li><a href="/api/health">/api/health</a></li>
  </ul>
</body>
</html>
"#;

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_template_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        create_template(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn create_template_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "original").unwrap();
        create_template(&path, "new content").unwrap();
        // Should NOT overwrite
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn onboard_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        // Relative dirs from the default config land in the working
        // directory, so point them into the temp dir first
        let mut config = aiplex_core::config::Config::default();
        config.server.uploads_dir = dir.path().join("uploads").display().to_string();
        config.server.public_dir = dir.path().join("public").display().to_string();
        save_config(&config, Some(&path)).unwrap();

        run(Some(&path)).unwrap();
        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("public/index.html").is_file());
    }
}
