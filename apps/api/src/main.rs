mod config;
mod embedding;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{create_embedder, verify_dimensions};
use crate::matching::engine::MatchEngine;
use crate::matching::vocabulary::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on values that do not parse)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Load skill vocabulary
    let vocabulary = match &config.skill_vocabulary_path {
        Some(path) => SkillVocabulary::load(path)
            .with_context(|| format!("Failed to load skill vocabulary from {}", path.display()))?,
        None => SkillVocabulary::builtin().context("Built-in skill vocabulary is invalid")?,
    };
    info!(
        "Skill vocabulary loaded: {} skills, {} aliases",
        vocabulary.len(),
        vocabulary.alias_count()
    );

    // Initialize embedding capability and probe its dimensionality
    let embedder = create_embedder(&config.embedding)?;
    verify_dimensions(embedder.as_ref()).await?;

    // Build the match engine
    let engine = MatchEngine::new(Arc::new(vocabulary), embedder, config.weights)?
        .with_min_resume_chars(config.min_resume_chars);
    let weights = engine.weights();
    info!(
        "Score weights: semantic {:.2}, keyword {:.2}",
        weights.semantic_weight, weights.keyword_weight
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine: Arc::new(engine),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
