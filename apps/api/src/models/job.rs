use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::analysis::job_analyzer::JobPosting;
use crate::errors::AppError;

/// A saved job posting.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    pub fn to_posting(&self) -> JobPosting {
        JobPosting {
            title: self.title.clone(),
            company: self.company.clone(),
            description: self.description.clone(),
            requirements: self.requirements.clone(),
        }
    }
}

pub async fn get_job(pool: &PgPool, job_id: Uuid, user_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, user_id, title, company, description, requirements, created_at
        FROM jobs
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_posting_copies_fields() {
        let row = JobRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Senior Rust Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Build services.".to_string(),
            requirements: vec!["5+ years Rust".to_string()],
            created_at: Utc::now(),
        };
        let posting = row.to_posting();
        assert_eq!(posting.title, "Senior Rust Engineer");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.requirements, vec!["5+ years Rust"]);
    }
}
