//! Topic repository module for database operations.

use super::{map_write_error, TopicStore};
use crate::errors::ApiError;
use crate::models::{NewTopic, Topic, TopicUpdate};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub const DUPLICATE_TOPIC: &str = "Topic with this name already exists";

pub async fn list_topics(pool: &PgPool) -> Result<Vec<Topic>, ApiError> {
    sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, topic_name, content, created_at, updated_at
        FROM topics
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list topics: {}", e)))
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Topic>, ApiError> {
    sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, topic_name, content, created_at, updated_at
        FROM topics
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch topic by id: {}", e)))
}

pub async fn get_by_name(pool: &PgPool, topic_name: &str) -> Result<Option<Topic>, ApiError> {
    sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, topic_name, content, created_at, updated_at
        FROM topics
        WHERE topic_name = $1
        "#,
    )
    .bind(topic_name)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch topic by name: {}", e)))
}

/// Create a topic. Returns `Conflict` when the name is taken.
pub async fn create_topic(pool: &PgPool, topic: &NewTopic) -> Result<Topic, ApiError> {
    sqlx::query_as::<_, Topic>(
        r#"
        INSERT INTO topics (topic_name, content)
        VALUES ($1, $2)
        RETURNING id, topic_name, content, created_at, updated_at
        "#,
    )
    .bind(&topic.topic_name)
    .bind(&topic.content)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, DUPLICATE_TOPIC, "Failed to create topic"))
}

/// Apply a partial update. Renaming onto an existing name is a `Conflict`.
pub async fn update_topic(
    pool: &PgPool,
    id: Uuid,
    changes: &TopicUpdate,
) -> Result<Option<Topic>, ApiError> {
    sqlx::query_as::<_, Topic>(
        r#"
        UPDATE topics
        SET topic_name = COALESCE($2, topic_name),
            content = COALESCE($3, content),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, topic_name, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(changes.topic_name.as_deref())
    .bind(changes.content.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, DUPLICATE_TOPIC, "Failed to update topic"))
}

pub async fn delete_topic(pool: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM topics WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to delete topic: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

/// `TopicStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgTopicStore {
    pool: PgPool,
}

impl PgTopicStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicStore for PgTopicStore {
    async fn find_all(&self) -> Result<Vec<Topic>, ApiError> {
        list_topics(&self.pool).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topic>, ApiError> {
        get_by_id(&self.pool, id).await
    }

    async fn find_by_name(&self, topic_name: &str) -> Result<Option<Topic>, ApiError> {
        get_by_name(&self.pool, topic_name).await
    }

    async fn insert(&self, topic: NewTopic) -> Result<Topic, ApiError> {
        create_topic(&self.pool, &topic).await
    }

    async fn update(&self, id: Uuid, changes: TopicUpdate) -> Result<Option<Topic>, ApiError> {
        update_topic(&self.pool, id, &changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        delete_topic(&self.pool, id).await
    }
}
