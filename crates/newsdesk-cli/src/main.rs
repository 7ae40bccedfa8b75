//! newsdesk - search news, keep collections of articles, manage your account.
//!
//! Thin command-line front end over `newsdesk-core`. Each invocation
//! restores the session from the stored token (renewing it if needed),
//! runs one command and exits.

mod app;
mod commands;
mod utils;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsdesk_core::Config;

use app::App;

/// Log file written in the cache directory.
const LOG_FILE: &str = "newsdesk.log";

/// Initialize the tracing subscriber for logging
fn init_tracing(cache_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // The log file is best effort; stderr logging works without it
    let file = std::fs::create_dir_all(cache_dir).ok().map(|_| {
        let appender = tracing_appender::rolling::never(cache_dir, LOG_FILE);
        tracing_appender::non_blocking(appender)
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = commands::parse(&args)?;

    let config_result = Config::load();
    let config = config_result.as_ref().cloned().unwrap_or_default();
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));

    let _guard = init_tracing(&cache_dir);
    if let Err(e) = config_result {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(api = %config.api_base_url(), "newsdesk starting");

    let mut app = App::new(config, cache_dir)?;
    app.run(command).await
}
