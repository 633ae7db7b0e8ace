mod config;
mod errors;
mod llm_client;
mod models;
mod rag;
mod routes;
mod state;

use anyhow::{ensure, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::rag::{Calibration, LazyIndex};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio API v{}", env!("CARGO_PKG_VERSION"));

    ensure!(
        config.resume_path.is_file(),
        "Resume file not found at {}",
        config.resume_path.display()
    );

    // The index itself is built on the first request (or GET /prewarm)
    let rag = Arc::new(LazyIndex::new(
        config.resume_path.clone(),
        Calibration::default(),
    ));
    info!("Resume source: {}", rag.source().display());

    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.groq_api_url.clone(),
        config.groq_chat_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        rag,
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
