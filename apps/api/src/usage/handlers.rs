//! Axum route handlers for the Usage API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::get_premium_flag;
use crate::state::AppState;
use crate::usage::quota::{usage_summary, QuotaLimits, UsageStatus};

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub is_premium: bool,
    pub usage: Vec<UsageStatus>,
}

/// GET /api/v1/usage?user_id=
pub async fn handle_get_usage(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageResponse>, AppError> {
    let is_premium = get_premium_flag(&state.db, query.user_id).await?;
    let usage = usage_summary(
        &state.db,
        query.user_id,
        QuotaLimits::from_config(&state.config),
        is_premium,
    )
    .await?;

    Ok(Json(UsageResponse { is_premium, usage }))
}
