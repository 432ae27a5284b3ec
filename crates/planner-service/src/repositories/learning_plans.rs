//! Learning plan repository module for database operations.
//!
//! Phases are stored as a JSONB document; prerequisites as a text array.

use super::LearningPlanStore;
use crate::errors::ApiError;
use crate::models::{LearningPlan, LearningPlanChanges, NewLearningPlan, Phase};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

const PLAN_COLUMNS: &str =
    "id, title, duration, prerequisites, phases, user_id, is_active, created_at, updated_at";

/// Row shape of the learning_plans table.
#[derive(Debug, sqlx::FromRow)]
struct LearningPlanRow {
    id: Uuid,
    title: String,
    duration: String,
    prerequisites: Vec<String>,
    phases: Json<Vec<Phase>>,
    user_id: Uuid,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LearningPlanRow> for LearningPlan {
    fn from(row: LearningPlanRow) -> Self {
        LearningPlan {
            id: row.id,
            title: row.title,
            duration: row.duration,
            prerequisites: row.prerequisites,
            phases: row.phases.0,
            user_id: row.user_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn list_plans(pool: &PgPool) -> Result<Vec<LearningPlan>, ApiError> {
    let rows = sqlx::query_as::<_, LearningPlanRow>(&format!(
        "SELECT {} FROM learning_plans ORDER BY created_at DESC",
        PLAN_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list learning plans: {}", e)))?;

    Ok(rows.into_iter().map(LearningPlan::from).collect())
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<LearningPlan>, ApiError> {
    let row = sqlx::query_as::<_, LearningPlanRow>(&format!(
        "SELECT {} FROM learning_plans WHERE id = $1",
        PLAN_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch learning plan: {}", e)))?;

    Ok(row.map(LearningPlan::from))
}

/// Active plans owned by a user, newest first.
pub async fn list_active_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<LearningPlan>, ApiError> {
    let rows = sqlx::query_as::<_, LearningPlanRow>(&format!(
        r#"
        SELECT {}
        FROM learning_plans
        WHERE user_id = $1 AND is_active = TRUE
        ORDER BY created_at DESC
        "#,
        PLAN_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list user learning plans: {}", e)))?;

    Ok(rows.into_iter().map(LearningPlan::from).collect())
}

pub async fn create_plan(pool: &PgPool, plan: &NewLearningPlan) -> Result<LearningPlan, ApiError> {
    let row = sqlx::query_as::<_, LearningPlanRow>(&format!(
        r#"
        INSERT INTO learning_plans (title, duration, prerequisites, phases, user_id, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        PLAN_COLUMNS
    ))
    .bind(&plan.title)
    .bind(&plan.duration)
    .bind(&plan.prerequisites)
    .bind(Json(&plan.phases))
    .bind(plan.user_id)
    .bind(plan.is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to create learning plan: {}", e)))?;

    Ok(row.into())
}

/// Apply a partial update. Returns `None` when no plan has this id.
pub async fn update_plan(
    pool: &PgPool,
    id: Uuid,
    changes: &LearningPlanChanges,
) -> Result<Option<LearningPlan>, ApiError> {
    let row = sqlx::query_as::<_, LearningPlanRow>(&format!(
        r#"
        UPDATE learning_plans
        SET title = COALESCE($2, title),
            duration = COALESCE($3, duration),
            prerequisites = COALESCE($4, prerequisites),
            phases = COALESCE($5, phases),
            user_id = COALESCE($6, user_id),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PLAN_COLUMNS
    ))
    .bind(id)
    .bind(changes.title.as_deref())
    .bind(changes.duration.as_deref())
    .bind(changes.prerequisites.clone())
    .bind(changes.phases.clone().map(Json))
    .bind(changes.user_id)
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to update learning plan: {}", e)))?;

    Ok(row.map(LearningPlan::from))
}

pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM learning_plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to delete learning plan: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

/// `LearningPlanStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgLearningPlanStore {
    pool: PgPool,
}

impl PgLearningPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearningPlanStore for PgLearningPlanStore {
    async fn find_all(&self) -> Result<Vec<LearningPlan>, ApiError> {
        list_plans(&self.pool).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LearningPlan>, ApiError> {
        get_by_id(&self.pool, id).await
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<LearningPlan>, ApiError> {
        list_active_by_user(&self.pool, user_id).await
    }

    async fn insert(&self, plan: NewLearningPlan) -> Result<LearningPlan, ApiError> {
        create_plan(&self.pool, &plan).await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: LearningPlanChanges,
    ) -> Result<Option<LearningPlan>, ApiError> {
        update_plan(&self.pool, id, &changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        delete_plan(&self.pool, id).await
    }
}
