mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::evaluator::{AnswerEvaluator, LlmAnswerScorer};
use crate::interview::orchestrator::Interviewer;
use crate::interview::store::SessionStore;
use crate::llm_client::{CompletionService, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let client = LlmClient::new(&config).context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", client.model());
    let llm: Arc<dyn CompletionService> = Arc::new(client);

    // Answer grading goes through the same client, bounded by the configured timeout
    let scorer = Arc::new(LlmAnswerScorer::new(Arc::clone(&llm)));
    let evaluator = Arc::new(AnswerEvaluator::new(
        scorer,
        Duration::from_secs(config.llm_timeout_secs),
    ));

    let state = AppState {
        interviewer: Arc::new(Interviewer::new(llm, evaluator)),
        sessions: SessionStore::new(),
        config: config.clone(),
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
