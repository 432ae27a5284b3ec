//! In-memory store implementations.
//!
//! Mirror the Postgres stores closely enough for service and HTTP tests:
//! unique columns raise `Conflict` with the same messages, IDs are random
//! UUIDs and listings follow insertion order.

use async_trait::async_trait;
use chrono::Utc;
use planner_service::errors::ApiError;
use planner_service::models::{
    LearningPlan, LearningPlanChanges, NewLearningPlan, NewTopic, NewUser, Topic, TopicUpdate,
    User, UserChanges, UserFilter,
};
use planner_service::repositories::topics::DUPLICATE_TOPIC;
use planner_service::repositories::users::DUPLICATE_EMAIL;
use planner_service::repositories::{LearningPlanStore, TopicStore, UserStore};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored row including the password hash.
    pub fn raw(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.raw(email))
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.mobile == mobile)
            .cloned())
    }

    async fn find_by_filter(&self, filter: &UserFilter) -> Result<Option<User>, ApiError> {
        if filter.is_empty() {
            return Err(ApiError::BadRequest("Empty user filter".to_string()));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| filter.matches(u))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(mobile) = changes.mobile {
            user.mobile = mobile;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryTopicStore {
    topics: Mutex<Vec<Topic>>,
}

impl InMemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TopicStore for InMemoryTopicStore {
    async fn find_all(&self) -> Result<Vec<Topic>, ApiError> {
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topic>, ApiError> {
        Ok(self.topics.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, topic_name: &str) -> Result<Option<Topic>, ApiError> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.topic_name == topic_name)
            .cloned())
    }

    async fn insert(&self, topic: NewTopic) -> Result<Topic, ApiError> {
        let mut topics = self.topics.lock().unwrap();
        if topics.iter().any(|t| t.topic_name == topic.topic_name) {
            return Err(ApiError::Conflict(DUPLICATE_TOPIC.to_string()));
        }

        let now = Utc::now();
        let row = Topic {
            id: Uuid::new_v4(),
            topic_name: topic.topic_name,
            content: topic.content,
            created_at: now,
            updated_at: now,
        };
        topics.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: TopicUpdate) -> Result<Option<Topic>, ApiError> {
        let mut topics = self.topics.lock().unwrap();
        if let Some(name) = &changes.topic_name {
            if topics.iter().any(|t| t.id != id && &t.topic_name == name) {
                return Err(ApiError::Conflict(DUPLICATE_TOPIC.to_string()));
            }
        }

        let Some(topic) = topics.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.topic_name {
            topic.topic_name = name;
        }
        if let Some(content) = changes.content {
            topic.content = content;
        }
        topic.updated_at = Utc::now();
        Ok(Some(topic.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut topics = self.topics.lock().unwrap();
        let before = topics.len();
        topics.retain(|t| t.id != id);
        Ok(topics.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryLearningPlanStore {
    plans: Mutex<Vec<LearningPlan>>,
}

impl InMemoryLearningPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LearningPlanStore for InMemoryLearningPlanStore {
    /// Newest first, like the Postgres listing.
    async fn find_all(&self) -> Result<Vec<LearningPlan>, ApiError> {
        Ok(self.plans.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LearningPlan>, ApiError> {
        Ok(self.plans.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<LearningPlan>, ApiError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id && p.is_active)
            .cloned()
            .collect())
    }

    async fn insert(&self, plan: NewLearningPlan) -> Result<LearningPlan, ApiError> {
        let now = Utc::now();
        let row = LearningPlan {
            id: Uuid::new_v4(),
            title: plan.title,
            duration: plan.duration,
            prerequisites: plan.prerequisites,
            phases: plan.phases,
            user_id: plan.user_id,
            is_active: plan.is_active,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: LearningPlanChanges,
    ) -> Result<Option<LearningPlan>, ApiError> {
        let mut plans = self.plans.lock().unwrap();
        let Some(plan) = plans.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            plan.title = title;
        }
        if let Some(duration) = changes.duration {
            plan.duration = duration;
        }
        if let Some(prerequisites) = changes.prerequisites {
            plan.prerequisites = prerequisites;
        }
        if let Some(phases) = changes.phases {
            plan.phases = phases;
        }
        if let Some(user_id) = changes.user_id {
            plan.user_id = user_id;
        }
        if let Some(is_active) = changes.is_active {
            plan.is_active = is_active;
        }
        plan.updated_at = Utc::now();
        Ok(Some(plan.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut plans = self.plans.lock().unwrap();
        let before = plans.len();
        plans.retain(|p| p.id != id);
        Ok(plans.len() != before)
    }
}
