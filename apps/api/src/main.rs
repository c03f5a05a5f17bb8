mod config;
mod data;
mod errors;
mod generation;
mod llm_client;
mod models;
mod programs;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::data::{load_guide, load_programs};
use crate::generation::decoder::SectionMarkers;
use crate::generation::generator::{Orchestrator, OrchestratorSettings};
use crate::generation::guide_format::GuideBlocks;
use crate::llm_client::models::default_model;
use crate::llm_client::{GeminiClient, GenerationParams};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reactions API v{}", env!("CARGO_PKG_VERSION"));

    // Load the expression guide and render its prompt blocks once
    let guide = load_guide(&config.guide_path)?;
    let blocks = GuideBlocks::from_guide(&guide);
    if guide.is_empty() {
        warn!("Expression guide is empty; every prompt block uses its built-in default");
    } else {
        info!("Expression guide loaded ({} sections)", guide.len());
    }

    // Load program history
    let programs = Arc::new(load_programs(&config.program_data_path)?);

    // Initialize Gemini client
    let generator = Arc::new(GeminiClient::new(config.gemini_timeout)?);
    info!(
        "Gemini client initialized (default model: {}, timeout: {}s, server key: {})",
        default_model().id,
        config.gemini_timeout.as_secs(),
        if config.gemini_api_key.is_some() { "set" } else { "unset" }
    );

    let orchestrator = Arc::new(Orchestrator::new(
        generator,
        programs.clone(),
        blocks,
        SectionMarkers::default(),
        OrchestratorSettings {
            default_api_key: config.gemini_api_key.clone(),
            default_ratios: config.default_ratios,
            progress_tick: config.progress_tick,
            params: GenerationParams::default(),
        },
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        programs,
        orchestrator,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
