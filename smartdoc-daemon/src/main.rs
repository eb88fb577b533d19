//! SmartDoc daemon - ask questions about uploaded documents.
//!
//! A single Rust binary that provides:
//! - PDF and spreadsheet upload with text extraction
//! - An initial summary of each document
//! - Question answering with per-session conversation history

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use smartdoc_core::{DocumentService, SessionStore};
use smartdoc_daemon::config::{SmartDocConfig, DEFAULT_CONFIG_FILE};
use smartdoc_daemon::llm::build_generator;
use smartdoc_daemon::server::{create_router, AppState};

/// Smart document assistant daemon
#[derive(Parser, Debug)]
#[command(name = "smartdoc-daemon")]
#[command(about = "Upload PDFs and spreadsheets and ask questions about them")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// HTTP port to listen on (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let mut config = SmartDocConfig::load(&cli.config)?;
    config.apply_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!("Starting SmartDoc daemon");
    info!(
        "Session capacity: {}, content limit: {} characters",
        config.documents.max_sessions, config.documents.max_content_chars
    );

    let generator = build_generator(&config.llm)?;
    let store = Arc::new(SessionStore::new(config.documents.max_sessions));
    let service = Arc::new(DocumentService::new(
        store,
        generator,
        config.service_config(),
    ));

    let state = AppState::new(service, config.server.max_upload_bytes);
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("SmartDoc daemon listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
