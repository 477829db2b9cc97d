//! Aiplex CLI — entry point.
//!
//! # Commands
//!
//! - `aiplex serve [--host HOST] [--port PORT] [--logs]` — run the HTTP server
//! - `aiplex status` — show configuration and provider key status
//! - `aiplex models [--json]` — list the built-in model catalog
//! - `aiplex onboard` — write a default config and create the served directories

mod helpers;
mod models_cmd;
mod onboard;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use aiplex_core::config::{load_config, Config};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Aiplex — one API in front of many AI providers
#[derive(Parser)]
#[command(name = "aiplex", version, about, long_about = None)]
struct Cli {
    /// Path to the config file (default: ~/.aiplex/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and serve the browser UI
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// First port to try (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,

        /// Emit logs as JSON lines
        #[arg(long, default_value_t = false)]
        log_json: bool,
    },

    /// Show configuration and provider status
    Status,

    /// List the model catalog the server starts with
    Models {
        /// Print as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Initialize configuration and directories
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve {
            host,
            port,
            logs,
            log_json,
        } => {
            init_logging(logs, log_json);
            let config = apply_serve_overrides(load_config(config_path), host, port);
            run_serve(config).await
        }
        Commands::Status => status::run(config_path),
        Commands::Models { json } => models_cmd::run(config_path, json),
        Commands::Onboard => onboard::run(config_path),
    }
}

/// Command-line flags beat config file and environment.
fn apply_serve_overrides(mut config: Config, host: Option<String>, port: Option<u16>) -> Config {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config
}

async fn run_serve(config: Config) -> Result<()> {
    helpers::print_banner();
    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting server"
    );
    aiplex_server::serve(config).await
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("aiplex=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
