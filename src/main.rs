mod config;
mod error;
mod fetch;
mod llm;
mod prompt;
mod server;
mod tailor;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::server::{create_router, AppState, SharedState};
use crate::tailor::TailorEngine;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "resume-tailor", version, about = "LLM-backed resume tailoring service")]
struct Cli {
    /// Path to the TOML config file (defaults to the user config)
    #[arg(long)]
    config: Option<String>,

    /// Override the listen host from the config
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port from the config
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("resume_tailor=debug".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    info!("Resume Tailor service starting");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_auto()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    let listener_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Binding to {}", listener_addr);

    let provider = Arc::new(LlmClient::new(&config.llm)?);
    info!(model = %config.llm.model, "Completion client initialized");

    let engine = TailorEngine::new(&config, provider)?;

    let state: SharedState = Arc::new(AppState {
        config: config.clone(),
        engine,
    });

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&listener_addr).await?;
    info!("Server listening on http://{}", listener_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
