//! Learning plan management.
//!
//! Incoming phases are normalized before storage: topics given as bare
//! strings become `{title, status: false}` and missing status flags default
//! to `false`.

use crate::errors::ApiError;
use crate::models::{
    CreateLearningPlanRequest, LearningPlan, LearningPlanChanges, MessageResponse,
    NewLearningPlan, Phase, PhaseInput, PlanTopic, TopicInput, UpdateLearningPlanRequest,
};
use crate::repositories::LearningPlanStore;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const PLAN_DELETED_MESSAGE: &str = "Learning plan deleted successfully";

pub fn plan_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Learning plan with ID {} not found", id))
}

#[derive(Clone)]
pub struct LearningPlanService {
    plans: Arc<dyn LearningPlanStore>,
}

impl LearningPlanService {
    pub fn new(plans: Arc<dyn LearningPlanStore>) -> Self {
        Self { plans }
    }

    #[instrument(skip_all, name = "planner.plans.create")]
    pub async fn create(&self, request: CreateLearningPlanRequest) -> Result<LearningPlan, ApiError> {
        let plan = NewLearningPlan {
            title: non_empty("title", &request.title)?,
            duration: non_empty("duration", &request.duration)?,
            prerequisites: request.prerequisites,
            phases: normalize_phases(request.phases)?,
            user_id: parse_user_id(&request.user_id)?,
            is_active: request.is_active.unwrap_or(true),
        };

        let created = self.plans.insert(plan).await?;
        tracing::info!(
            target: "planner.plans",
            plan_id = %created.id,
            user_id = %created.user_id,
            phases = created.phases.len(),
            "Learning plan created"
        );
        Ok(created)
    }

    /// All plans, or the active plans of one user (newest first) when `user_id` is given.
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<LearningPlan>, ApiError> {
        match user_id {
            Some(raw) => self.list_for_user(parse_user_id(raw)?).await,
            None => self.plans.find_all().await,
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LearningPlan>, ApiError> {
        self.plans.find_active_by_user(user_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<LearningPlan, ApiError> {
        self.plans
            .find_by_id(id)
            .await?
            .ok_or_else(|| plan_not_found(id))
    }

    #[instrument(skip_all, name = "planner.plans.update")]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateLearningPlanRequest,
    ) -> Result<LearningPlan, ApiError> {
        let changes = LearningPlanChanges {
            title: request
                .title
                .as_deref()
                .map(|v| non_empty("title", v))
                .transpose()?,
            duration: request
                .duration
                .as_deref()
                .map(|v| non_empty("duration", v))
                .transpose()?,
            prerequisites: request.prerequisites,
            phases: request.phases.map(normalize_phases).transpose()?,
            user_id: request.user_id.as_deref().map(parse_user_id).transpose()?,
            is_active: request.is_active,
        };

        self.plans
            .update(id, changes)
            .await?
            .ok_or_else(|| plan_not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<MessageResponse, ApiError> {
        if !self.plans.delete(id).await? {
            return Err(plan_not_found(id));
        }
        tracing::info!(target: "planner.plans", plan_id = %id, "Learning plan deleted");
        Ok(MessageResponse::new(PLAN_DELETED_MESSAGE))
    }

    /// Set the status flag of the phase whose focus is `phase_name`.
    #[instrument(skip_all, name = "planner.plans.phase_status")]
    pub async fn set_phase_status(
        &self,
        id: Uuid,
        phase_name: &str,
        status: bool,
    ) -> Result<LearningPlan, ApiError> {
        let phase_name = non_empty("phaseName", phase_name)?;
        let mut plan = self.get(id).await?;

        if !set_phase_status(&mut plan.phases, &phase_name, status) {
            return Err(ApiError::NotFound(format!(
                "Phase '{}' not found in learning plan {}",
                phase_name, id
            )));
        }

        self.save_phases(id, plan.phases).await
    }

    /// Set the status flag of every topic titled `topic_title`.
    #[instrument(skip_all, name = "planner.plans.topic_status")]
    pub async fn set_topic_status(
        &self,
        id: Uuid,
        topic_title: &str,
        status: bool,
    ) -> Result<LearningPlan, ApiError> {
        let topic_title = non_empty("topicTitle", topic_title)?;
        let mut plan = self.get(id).await?;

        if !set_topic_status(&mut plan.phases, &topic_title, status) {
            return Err(ApiError::NotFound(format!(
                "Topic '{}' not found in learning plan {}",
                topic_title, id
            )));
        }

        self.save_phases(id, plan.phases).await
    }

    async fn save_phases(&self, id: Uuid, phases: Vec<Phase>) -> Result<LearningPlan, ApiError> {
        let changes = LearningPlanChanges {
            phases: Some(phases),
            ..Default::default()
        };
        self.plans
            .update(id, changes)
            .await?
            .ok_or_else(|| plan_not_found(id))
    }
}

/// Validate and normalize incoming phases.
pub fn normalize_phases(phases: Vec<PhaseInput>) -> Result<Vec<Phase>, ApiError> {
    phases
        .into_iter()
        .map(|phase| {
            let topics = phase
                .topics
                .into_iter()
                .map(|topic| {
                    let (title, status) = match topic {
                        TopicInput::Title(title) => (title, false),
                        TopicInput::Entry { title, status } => (title, status.unwrap_or(false)),
                    };
                    Ok(PlanTopic {
                        title: non_empty("topic title", &title)?,
                        status,
                    })
                })
                .collect::<Result<Vec<_>, ApiError>>()?;

            Ok(Phase {
                focus: non_empty("phase focus", &phase.focus)?,
                status: phase.status.unwrap_or(false),
                duration: non_empty("phase duration", &phase.duration)?,
                topics,
            })
        })
        .collect()
}

/// Returns false when no phase has this focus.
pub fn set_phase_status(phases: &mut [Phase], phase_name: &str, status: bool) -> bool {
    match phases.iter_mut().find(|p| p.focus == phase_name) {
        Some(phase) => {
            phase.status = status;
            true
        }
        None => false,
    }
}

/// Returns false when no topic has this title.
pub fn set_topic_status(phases: &mut [Phase], topic_title: &str, status: bool) -> bool {
    let mut found = false;
    for topic in phases
        .iter_mut()
        .flat_map(|p| p.topics.iter_mut())
        .filter(|t| t.title == topic_title)
    {
        topic.status = status;
        found = true;
    }
    found
}

fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest("userId must be a valid ID".to_string()))
}

fn non_empty(field: &str, value: &str) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} should not be empty", field)));
    }
    Ok(value.trim().to_string())
}
