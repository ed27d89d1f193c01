//! # tianfu-server
//!
//! HTTP backend for "天父的信" (letters from the Heavenly Father).
//!
//! This binary provides:
//! - **Letter generation** through an OpenAI-compatible chat-completion API,
//!   or a deterministic demo letter when no API key is configured
//! - **Mailbox**: a capped, file-backed list of saved letters with
//!   create/list/delete
//! - **Static files** for the front-end, plus health check and topic catalogue

mod api;
mod config;
mod error;
mod generator;
mod normalize;
mod prompt;
mod provider;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tianfu_shared::constants::APP_NAME;
use tianfu_store::Mailbox;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::generator::Generator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started_at = Instant::now();

    // -----------------------------------------------------------------------
    // 1. Load .env (if any) and initialize tracing (respects RUST_LOG)
    // -----------------------------------------------------------------------
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,tianfu_server=debug,tianfu_store=debug")
            }),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Mailbox (creates the file if missing)
    let mailbox = Arc::new(Mailbox::open(config.mailbox_path.clone()).await?);

    // Live or demo generation, fixed for the lifetime of the process
    let generator = Arc::new(Generator::from_config(&config)?);
    info!(live = generator.is_live(), "Letter generator ready");

    let http_addr = config.http_addr;
    let app_state = AppState {
        mailbox,
        generator,
        config: Arc::new(config),
        started_at,
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
