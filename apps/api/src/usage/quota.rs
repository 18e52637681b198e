//! Daily usage quota: FREE vs PREMIUM limits per feature, reset at UTC midnight.
//!
//! Enforcement is read-check-increment without a lock. Two concurrent requests
//! can both pass the gate at `limit - 1`; the counter then ends one over.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ResumeTailoring,
    CoverLetter,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::ResumeTailoring, Feature::CoverLetter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::ResumeTailoring => "resume_tailoring",
            Feature::CoverLetter => "cover_letter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub free_daily: u32,
    pub premium_daily: u32,
}

impl QuotaLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            free_daily: config.free_daily_limit,
            premium_daily: config.premium_daily_limit,
        }
    }

    pub fn limit_for(&self, is_premium: bool) -> u32 {
        if is_premium {
            self.premium_daily
        } else {
            self.free_daily
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStatus {
    pub feature: Feature,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub resets_at: DateTime<Utc>,
}

pub fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Duration::days(1);
    Utc.from_utc_datetime(&tomorrow.and_time(NaiveTime::default()))
}

/// Pure gate decision: `Ok` while `used < limit`.
pub fn evaluate(
    feature: Feature,
    used: u32,
    limit: u32,
    now: DateTime<Utc>,
) -> Result<UsageStatus, AppError> {
    let resets_at = next_utc_midnight(now);
    if used >= limit {
        return Err(AppError::QuotaExceeded {
            feature: feature.as_str().to_string(),
            limit,
            used,
            resets_at,
        });
    }
    Ok(UsageStatus {
        feature,
        used,
        limit,
        remaining: limit - used,
        resets_at,
    })
}

pub async fn current_usage(
    pool: &PgPool,
    user_id: Uuid,
    feature: Feature,
    day: NaiveDate,
) -> Result<u32, AppError> {
    let count = sqlx::query_scalar::<_, i32>(
        "SELECT count FROM usage_counters WHERE user_id = $1 AND feature = $2 AND day = $3",
    )
    .bind(user_id)
    .bind(feature.as_str())
    .bind(day)
    .fetch_optional(pool)
    .await?
    .unwrap_or(0);

    Ok(count.max(0) as u32)
}

/// Rejects with `QuotaExceeded` once today's count reaches the tier limit.
/// Must run before any completion call.
pub async fn check_quota(
    pool: &PgPool,
    user_id: Uuid,
    feature: Feature,
    limits: QuotaLimits,
    is_premium: bool,
) -> Result<UsageStatus, AppError> {
    let now = Utc::now();
    let used = current_usage(pool, user_id, feature, now.date_naive()).await?;
    let limit = limits.limit_for(is_premium);
    debug!(
        "Quota check for user {user_id}: {} {used}/{limit}",
        feature.as_str()
    );
    evaluate(feature, used, limit, now)
}

/// Counts one successful operation for today. Call only after the result is persisted.
pub async fn increment_usage(pool: &PgPool, user_id: Uuid, feature: Feature) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO usage_counters (user_id, feature, day, count)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (user_id, feature, day)
        DO UPDATE SET count = usage_counters.count + 1
        "#,
    )
    .bind(user_id)
    .bind(feature.as_str())
    .bind(Utc::now().date_naive())
    .execute(pool)
    .await?;

    info!("Recorded {} usage for user {user_id}", feature.as_str());
    Ok(())
}

pub async fn usage_summary(
    pool: &PgPool,
    user_id: Uuid,
    limits: QuotaLimits,
    is_premium: bool,
) -> Result<Vec<UsageStatus>, AppError> {
    let now = Utc::now();
    let limit = limits.limit_for(is_premium);
    let mut summary = Vec::with_capacity(Feature::ALL.len());
    for feature in Feature::ALL {
        let used = current_usage(pool, user_id, feature, now.date_naive()).await?;
        summary.push(UsageStatus {
            feature,
            used,
            limit,
            remaining: limit.saturating_sub(used),
            resets_at: next_utc_midnight(now),
        });
    }
    Ok(summary)
}
