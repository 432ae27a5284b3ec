//! Repository layer.
//!
//! Each submodule holds free async functions over a `PgPool` plus a `Pg*Store`
//! adapter implementing the store trait the services consume. Services only
//! see the traits, so tests can swap in in-memory stores.

pub mod learning_plans;
pub mod topics;
pub mod users;

pub use learning_plans::PgLearningPlanStore;
pub use topics::PgTopicStore;
pub use users::PgUserStore;

use crate::errors::ApiError;
use crate::models::{
    LearningPlan, LearningPlanChanges, NewLearningPlan, NewTopic, NewUser, Topic, TopicUpdate,
    User, UserChanges, UserFilter,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence operations on user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, ApiError>;
    /// First user matching every set field. Fails with `BadRequest` on an empty filter.
    async fn find_by_filter(&self, filter: &UserFilter) -> Result<Option<User>, ApiError>;
    /// Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, ApiError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Persistence operations on topics.
#[async_trait]
pub trait TopicStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Topic>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topic>, ApiError>;
    async fn find_by_name(&self, topic_name: &str) -> Result<Option<Topic>, ApiError>;
    /// Fails with `Conflict` when the name is taken.
    async fn insert(&self, topic: NewTopic) -> Result<Topic, ApiError>;
    async fn update(&self, id: Uuid, changes: TopicUpdate) -> Result<Option<Topic>, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Persistence operations on learning plans.
#[async_trait]
pub trait LearningPlanStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<LearningPlan>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LearningPlan>, ApiError>;
    /// Active plans of a user, newest first.
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<LearningPlan>, ApiError>;
    async fn insert(&self, plan: NewLearningPlan) -> Result<LearningPlan, ApiError>;
    async fn update(
        &self,
        id: Uuid,
        changes: LearningPlanChanges,
    ) -> Result<Option<LearningPlan>, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Map a write error, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(err: sqlx::Error, conflict_message: &str, context: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::Conflict(conflict_message.to_string())
        }
        _ => ApiError::Database(format!("{}: {}", context, err)),
    }
}
