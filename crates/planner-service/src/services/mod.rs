pub mod ai_service;
pub mod auth_service;
pub mod learning_plan_service;
pub mod openai_client;
pub mod token_service;
pub mod topic_service;
pub mod user_service;
