//! Glyph puzzle client binary.
//!
//! This binary is the composition root that assembles:
//! 1. Content (built-in or from `GLYPH_DATA_DIR`)
//! 2. Runtime (puzzle session) via `Runtime::builder()`
//! 3. Frontend (line-oriented terminal UI)

mod config;
mod frontend;
mod logging;

use anyhow::{Context, Result};
use glyph_content::{ContentFactory, builtin};
use runtime::Runtime;

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    logging::setup_logging(config.session_id.as_deref(), config.log_dir.as_deref())?;

    tracing::info!("Starting glyph client");
    tracing::info!(?config, "client configuration");

    let bundle = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_bundle()
            .with_context(|| format!("loading content from {}", dir.display()))?,
        None => builtin::bundle().context("loading built-in content")?,
    };

    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .content(bundle)
        .build()
        .await?;
    tracing::info!("Runtime built successfully");

    frontend::run(runtime.handle()).await?;

    runtime.shutdown().await?;
    tracing::info!("Client shutdown complete");
    Ok(())
}
