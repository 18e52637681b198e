use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::CompletionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Daily limit reached for {feature}: {used}/{limit}")]
    QuotaExceeded {
        feature: String,
        limit: u32,
        used: u32,
        resets_at: DateTime<Utc>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::QuotaExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, "LIMIT_REACHED"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Completion(CompletionError::Authentication { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "COMPLETION_ERROR")
            }
            AppError::Completion(_) => (StatusCode::BAD_GATEWAY, "COMPLETION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) => json!({
                "error": { "code": code, "message": msg }
            }),
            AppError::QuotaExceeded {
                feature,
                limit,
                used,
                resets_at,
            } => json!({
                "error": {
                    "code": code,
                    "message": format!("Daily limit of {limit} reached for {feature}"),
                    "feature": feature,
                    "limit": limit,
                    "used": used,
                    "resets_at": resets_at,
                }
            }),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({
                    "error": { "code": code, "message": "A database error occurred" }
                })
            }
            AppError::Completion(e) => {
                tracing::error!("Completion error: {e}");
                let message = match e {
                    CompletionError::Authentication { .. } => {
                        "The AI service is not configured correctly".to_string()
                    }
                    other => format!("The AI service failed: {other}"),
                };
                json!({
                    "error": { "code": code, "message": message }
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({
                    "error": { "code": code, "message": "An internal server error occurred" }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_maps_to_429_limit_reached() {
        let err = AppError::QuotaExceeded {
            feature: "resume_tailoring".to_string(),
            limit: 3,
            used: 3,
            resets_at: Utc::now(),
        };
        assert_eq!(
            err.status_and_code(),
            (StatusCode::TOO_MANY_REQUESTS, "LIMIT_REACHED")
        );
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_completion_auth_is_503_other_failures_502() {
        let auth = AppError::from(CompletionError::Authentication {
            status: 401,
            message: "bad key".to_string(),
        });
        assert_eq!(auth.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);

        let exhausted = AppError::from(CompletionError::Exhausted {
            attempts: 3,
            last_message: "HTTP 503".to_string(),
        });
        assert_eq!(exhausted.status_and_code(), (StatusCode::BAD_GATEWAY, "COMPLETION_ERROR"));
    }

    #[test]
    fn test_not_found_is_404() {
        let response = AppError::NotFound("Resume x not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
