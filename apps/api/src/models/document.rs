use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
        }
    }
}

/// A generated document. The pipeline writes it once; later edits touch
/// `content` and `updated_at` only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoredDocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub content: String,
    pub source_resume_id: Uuid,
    pub job_id: Uuid,
    pub tone: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
    pub estimated_cost: f64,
    pub match_score: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `insert_document`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub kind: DocumentKind,
    pub content: String,
    pub source_resume_id: Uuid,
    pub job_id: Uuid,
    pub tone: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost: f64,
    pub match_score: Option<Value>,
}

const DOCUMENT_COLUMNS: &str = "id, user_id, kind, content, source_resume_id, job_id, tone, model, \
    prompt_tokens, completion_tokens, total_tokens, estimated_cost, match_score, created_at, updated_at";

pub async fn insert_document(pool: &PgPool, doc: NewDocument) -> Result<TailoredDocumentRow, AppError> {
    let sql = format!(
        r#"
        INSERT INTO tailored_documents
            (id, user_id, kind, content, source_resume_id, job_id, tone, model,
             prompt_tokens, completion_tokens, total_tokens, estimated_cost, match_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {DOCUMENT_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, TailoredDocumentRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(doc.user_id)
        .bind(doc.kind.as_str())
        .bind(&doc.content)
        .bind(doc.source_resume_id)
        .bind(doc.job_id)
        .bind(&doc.tone)
        .bind(&doc.model)
        .bind(doc.prompt_tokens as i32)
        .bind(doc.completion_tokens as i32)
        .bind(doc.total_tokens as i32)
        .bind(doc.estimated_cost)
        .bind(&doc.match_score)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

pub async fn get_document(
    pool: &PgPool,
    document_id: Uuid,
    user_id: Uuid,
) -> Result<TailoredDocumentRow, AppError> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM tailored_documents WHERE id = $1 AND user_id = $2");
    sqlx::query_as::<_, TailoredDocumentRow>(&sql)
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))
}

/// User edit path: replaces the content and bumps `updated_at`.
pub async fn update_document_content(
    pool: &PgPool,
    document_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<TailoredDocumentRow, AppError> {
    let sql = format!(
        r#"
        UPDATE tailored_documents
        SET content = $3, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING {DOCUMENT_COLUMNS}
        "#
    );
    sqlx::query_as::<_, TailoredDocumentRow>(&sql)
        .bind(document_id)
        .bind(user_id)
        .bind(content)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_column_values() {
        assert_eq!(DocumentKind::Resume.as_str(), "resume");
        assert_eq!(DocumentKind::CoverLetter.as_str(), "cover_letter");
        assert_eq!(
            serde_json::to_string(&DocumentKind::CoverLetter).unwrap(),
            r#""cover_letter""#
        );
    }
}
