use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Loads a user's premium flag. Unknown users are rejected with 404.
pub async fn get_premium_flag(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>("SELECT is_premium FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}
