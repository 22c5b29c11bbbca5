//! Persistence boundary — hands validated results to PostgreSQL.
//!
//! Write-only: the recommendation core never reads these rows back.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::RecommendationResult;
use crate::recommendation::policy::{Recommendation, Variant};

/// Inserts one result row and returns its id, or `None` for an empty result.
pub async fn persist_result<T: Recommendation>(
    pool: &PgPool,
    user_id: Uuid,
    result: &RecommendationResult<T>,
) -> Result<Option<Uuid>, AppError> {
    if result.is_empty() {
        return Ok(None);
    }

    let variant = T::policy().variant;
    let items = serde_json::to_value(&result.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {variant} items: {e}")))?;
    let id = Uuid::new_v4();

    sqlx::query(insert_statement(variant))
        .bind(id)
        .bind(user_id)
        .bind(&items)
        .bind(result.items.len() as i32)
        .execute(pool)
        .await?;

    info!(%variant, %user_id, %id, count = result.items.len(), "Persisted recommendations");
    Ok(Some(id))
}

fn insert_statement(variant: Variant) -> &'static str {
    match variant {
        Variant::Job => {
            "INSERT INTO job_recommendations (id, user_id, items, item_count) VALUES ($1, $2, $3, $4)"
        }
        Variant::Course => {
            "INSERT INTO course_recommendations (id, user_id, items, item_count) VALUES ($1, $2, $3, $4)"
        }
    }
}
