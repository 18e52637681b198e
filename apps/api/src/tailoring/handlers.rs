//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::job_analyzer::{JobPosting, JobProfile};
use crate::errors::AppError;
use crate::models::document::{get_document, update_document_content, TailoredDocumentRow};
use crate::state::AppState;
use crate::tailoring::match_scorer::MatchScore;
use crate::tailoring::pipeline::{generate_cover_letter, tailor_resume, TailorRequest, TailorResponse};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub posting: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub job_profile: JobProfile,
}

#[derive(Debug, Deserialize)]
pub struct ContentAgainstJobRequest {
    pub content: String,
    pub posting: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub match_score: MatchScore,
    pub job_profile: JobProfile,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub content: String,
    pub match_score: MatchScore,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub user_id: Uuid,
    pub content: String,
}

fn require_posting(posting: &JobPosting) -> Result<(), AppError> {
    if posting.title.trim().is_empty() && posting.description.trim().is_empty() {
        return Err(AppError::Validation(
            "posting needs a title or a description".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor/resume
///
/// Full pipeline against the user's saved resume and job. Counts toward the
/// daily `resume_tailoring` quota.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    Ok(Json(tailor_resume(&state, request).await?))
}

/// POST /api/v1/tailor/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    Ok(Json(generate_cover_letter(&state, request).await?))
}

/// POST /api/v1/jobs/analyze
///
/// Previews the extracted JobProfile for an inline posting. No quota, no completion call.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    require_posting(&request.posting)?;
    let job_profile = state.analyzer.analyze(&request.posting);
    Ok(Json(AnalyzeJobResponse { job_profile }))
}

/// POST /api/v1/match-score
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<ContentAgainstJobRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    require_posting(&request.posting)?;
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let job_profile = state.analyzer.analyze(&request.posting);
    let match_score = state.scorer.score(&request.content, &job_profile);
    Ok(Json(MatchScoreResponse {
        match_score,
        job_profile,
    }))
}

/// POST /api/v1/ats/optimize
///
/// Runs the ATS pass over caller-supplied text and scores the result.
pub async fn handle_ats_optimize(
    State(state): State<AppState>,
    Json(request): Json<ContentAgainstJobRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    require_posting(&request.posting)?;

    let profile = state.analyzer.analyze(&request.posting);
    let content = state.optimizer.optimize(&request.content, &profile);
    let match_score = state.scorer.score(&content, &profile);
    Ok(Json(OptimizeResponse {
        content,
        match_score,
    }))
}

/// GET /api/v1/documents/:id?user_id=
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<TailoredDocumentRow>, AppError> {
    Ok(Json(get_document(&state.db, document_id, owner.user_id).await?))
}

/// PATCH /api/v1/documents/:id
///
/// User edit. Only `content` changes; generation metadata stays as created.
pub async fn handle_update_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<TailoredDocumentRow>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    let document =
        update_document_content(&state.db, document_id, request.user_id, &request.content).await?;
    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_without_title_or_description_rejected() {
        assert!(require_posting(&JobPosting::default()).is_err());
        let posting = JobPosting {
            title: "Data Engineer".to_string(),
            ..Default::default()
        };
        assert!(require_posting(&posting).is_ok());
    }

    #[test]
    fn test_analyze_request_accepts_minimal_posting() {
        let request: AnalyzeJobRequest =
            serde_json::from_str(r#"{"posting": {"title": "QA Engineer"}}"#).unwrap();
        assert_eq!(request.posting.title, "QA Engineer");
        assert!(request.posting.requirements.is_empty());
    }
}
