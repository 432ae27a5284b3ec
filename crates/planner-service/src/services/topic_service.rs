use crate::errors::ApiError;
use crate::models::{NewTopic, Topic, TopicUpdate};
use crate::repositories::TopicStore;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const TOPIC_NOT_FOUND: &str = "Topic not found";

#[derive(Clone)]
pub struct TopicService {
    topics: Arc<dyn TopicStore>,
}

impl TopicService {
    pub fn new(topics: Arc<dyn TopicStore>) -> Self {
        Self { topics }
    }

    /// Create a topic. Duplicate names surface as `Conflict` from the store.
    #[instrument(skip_all, name = "planner.topics.create")]
    pub async fn create(&self, request: NewTopic) -> Result<Topic, ApiError> {
        let topic = NewTopic {
            topic_name: non_empty("topicName", &request.topic_name)?,
            content: non_empty("content", &request.content)?,
        };

        let created = self.topics.insert(topic).await?;
        tracing::info!(target: "planner.topics", topic_id = %created.id, "Topic created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Topic>, ApiError> {
        self.topics.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Topic, ApiError> {
        self.topics
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(TOPIC_NOT_FOUND.to_string()))
    }

    pub async fn get_by_name(&self, topic_name: &str) -> Result<Topic, ApiError> {
        self.topics
            .find_by_name(topic_name)
            .await?
            .ok_or_else(|| ApiError::NotFound(TOPIC_NOT_FOUND.to_string()))
    }

    /// Lookup for the search endpoint, which reports a miss in its body rather than as 404.
    pub async fn search(&self, topic_name: &str) -> Result<Option<Topic>, ApiError> {
        self.topics.find_by_name(topic_name).await
    }

    #[instrument(skip_all, name = "planner.topics.update")]
    pub async fn update(&self, id: Uuid, request: TopicUpdate) -> Result<Topic, ApiError> {
        let changes = TopicUpdate {
            topic_name: request
                .topic_name
                .as_deref()
                .map(|v| non_empty("topicName", v))
                .transpose()?,
            content: request
                .content
                .as_deref()
                .map(|v| non_empty("content", v))
                .transpose()?,
        };

        self.topics
            .update(id, changes)
            .await?
            .ok_or_else(|| ApiError::NotFound(TOPIC_NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        if !self.topics.delete(id).await? {
            return Err(ApiError::NotFound(TOPIC_NOT_FOUND.to_string()));
        }
        tracing::info!(target: "planner.topics", topic_id = %id, "Topic deleted");
        Ok(true)
    }
}

fn non_empty(field: &str, value: &str) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} should not be empty", field)));
    }
    Ok(value.trim().to_string())
}
