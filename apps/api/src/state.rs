use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::job_analyzer::JobAnalyzer;
use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::tailoring::ats_optimizer::AtsOptimizer;
use crate::tailoring::match_scorer::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub completion: CompletionClient,
    /// Owns the signal extractor and its compiled keyword matchers.
    pub analyzer: Arc<JobAnalyzer>,
    pub optimizer: Arc<AtsOptimizer>,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
    pub config: Config,
}
