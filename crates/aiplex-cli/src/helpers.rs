//! Shared CLI helpers — config path, banner, check marks.

use std::path::{Path, PathBuf};

use colored::Colorize;

use aiplex_core::config::get_config_path;

/// The config file a command operates on.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path)
}

/// `✓` when the path exists, a red `(not found)` otherwise.
pub fn existence_mark(path: &Path) -> String {
    if path.exists() {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

/// Print the banner shown at server start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "◆ Aiplex".cyan().bold(), version.dimmed());
    println!("{}", "Ctrl+C to stop".dimmed());
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
