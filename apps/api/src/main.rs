mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod tailoring;
mod usage;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extractor::SignalExtractor;
use crate::analysis::job_analyzer::JobAnalyzer;
use crate::analysis::keywords::KeywordLists;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::CompletionClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::ats_optimizer::AtsOptimizer;
use crate::tailoring::match_scorer::{KeywordMatchScorer, MatchScorer};

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

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Keyword lists: embedded defaults unless KEYWORD_LISTS_PATH is set
    let lists = KeywordLists::load(config.keyword_lists_path.as_deref().map(Path::new))
        .context("Failed to load keyword lists")?;
    info!(
        "Keyword lists loaded: {} technical, {} soft, {} industry terms",
        lists.technical_skills.len(),
        lists.soft_skills.len(),
        lists.industry_terms.len()
    );

    let extractor = Arc::new(SignalExtractor::new(&lists).context("Invalid keyword term")?);
    let analyzer = Arc::new(JobAnalyzer::new(extractor).context("Failed to build job analyzer")?);
    let optimizer = Arc::new(AtsOptimizer::new().context("Failed to build ATS optimizer")?);

    // Match scorer (KeywordMatchScorer by default)
    let scorer: Arc<dyn MatchScorer> = Arc::new(KeywordMatchScorer::new(lists));
    info!("Match scorer backend: {}", scorer.backend());

    // Initialize completion client
    let completion = CompletionClient::from_config(&config)?;
    info!(
        "Completion client initialized (model: {}, attempts: {})",
        completion.defaults().model,
        completion.defaults().retries
    );

    // Build app state
    let state = AppState {
        db,
        completion,
        analyzer,
        optimizer,
        scorer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the web client's domain is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
