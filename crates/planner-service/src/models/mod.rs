//! Records, request bodies and response shapes.
//!
//! Response types serialize with camelCase keys and expose their primary key
//! as `_id`, which is the shape existing clients of the planner API read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// User model (maps to users table)
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Custom Debug implementation that redacts contact details and the hash.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &"[REDACTED]")
            .field("mobile", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// User as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration request body.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub password: String,
}

/// Partial user update body.
#[derive(Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
}

/// User search body. At least one field must be present.
#[derive(Debug, Default, Deserialize)]
pub struct SearchUserRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Validated user row to insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
}

/// Column changes for a user update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password_hash: Option<String>,
}

/// Equality filter over user columns, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.email.is_none() && self.mobile.is_none()
    }

    /// True when every set field equals the user's column.
    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.name.as_ref().map_or(true, |v| &user.name == v)
            && self.email.as_ref().map_or(true, |v| &user.email == v)
            && self.mobile.as_ref().map_or(true, |v| &user.mobile == v)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Principal resolved from a verified access token.
///
/// Inserted into request extensions by the access guard.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("user_id", &self.user_id)
            .field("email", &"[REDACTED]")
            .field("name", &"[REDACTED]")
            .finish()
    }
}

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Topic model (maps to topics table)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub topic_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    #[serde(default)]
    pub topic_name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdate {
    pub topic_name: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTopicRequest {
    #[serde(default)]
    pub topic_name: String,
}

// ---------------------------------------------------------------------------
// Learning plans
// ---------------------------------------------------------------------------

/// A topic inside a phase, with its completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTopic {
    pub title: String,
    #[serde(default)]
    pub status: bool,
}

/// One phase of a learning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub focus: String,
    #[serde(default)]
    pub status: bool,
    pub duration: String,
    #[serde(default)]
    pub topics: Vec<PlanTopic>,
}

/// Learning plan as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub duration: String,
    pub prerequisites: Vec<String>,
    pub phases: Vec<Phase>,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Topic as accepted on input: either a bare title or a `{title, status?}` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TopicInput {
    Title(String),
    Entry { title: String, status: Option<bool> },
}

/// Phase as accepted on input.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseInput {
    #[serde(default)]
    pub focus: String,
    pub status: Option<bool>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub topics: Vec<TopicInput>,
}

/// Learning plan creation body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningPlanRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub phases: Vec<PhaseInput>,
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

/// Partial learning plan update body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLearningPlanRequest {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub prerequisites: Option<Vec<String>>,
    pub phases: Option<Vec<PhaseInput>>,
    pub user_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhaseStatusRequest {
    #[serde(default)]
    pub phase_name: String,
    pub status: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicStatusRequest {
    #[serde(default)]
    pub topic_title: String,
    pub status: bool,
}

/// Optional `?userId=` filter on the plan listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlanQuery {
    pub user_id: Option<String>,
}

/// Validated learning plan row to insert.
#[derive(Debug, Clone)]
pub struct NewLearningPlan {
    pub title: String,
    pub duration: String,
    pub prerequisites: Vec<String>,
    pub phases: Vec<Phase>,
    pub user_id: Uuid,
    pub is_active: bool,
}

/// Column changes for a learning plan update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct LearningPlanChanges {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub prerequisites: Option<Vec<String>>,
    pub phases: Option<Vec<Phase>>,
    pub user_id: Option<Uuid>,
    pub is_active: Option<bool>,
}
