//! HTTP routes.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers::{
    auth_handler, learning_plan_handler, openai_handler, topic_handler, user_handler,
};
use crate::middleware::access_guard::{require_auth, AccessGuard, ExemptRoutes};
use crate::repositories::{LearningPlanStore, TopicStore, UserStore};
use crate::services::ai_service::AiService;
use crate::services::auth_service::AuthService;
use crate::services::learning_plan_service::LearningPlanService;
use crate::services::openai_client::CompletionApi;
use crate::services::token_service::TokenService;
use crate::services::topic_service::TopicService;
use crate::services::user_service::UserService;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Timeout for CRUD routes.
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Added to the provider timeout to bound `/openai/*` routes.
pub const AI_TIMEOUT_MARGIN_SECONDS: u64 = 5;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    pub user_service: UserService,
    pub auth_service: Arc<AuthService>,
    pub topic_service: TopicService,
    pub learning_plan_service: LearningPlanService,
    pub ai_service: AiService,

    /// Guard applied to every request; shares the auth service's verifier.
    pub guard: Arc<AccessGuard>,
}

impl AppState {
    /// Wire services over the given stores and completion API.
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        topics: Arc<dyn TopicStore>,
        plans: Arc<dyn LearningPlanStore>,
        completion_api: Arc<dyn CompletionApi>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry_seconds);
        let auth_service = Arc::new(AuthService::new(users.clone(), tokens));
        let guard = Arc::new(AccessGuard::new(
            ExemptRoutes::public_defaults(),
            auth_service.clone(),
        ));

        Self {
            user_service: UserService::new(users, config.bcrypt_cost),
            topic_service: TopicService::new(topics),
            learning_plan_service: LearningPlanService::new(plans),
            ai_service: AiService::new(completion_api, config.openai.model.clone()),
            auth_service,
            guard,
            config,
        }
    }
}

/// Build the application routes.
///
/// Every route sits behind the access guard, unmatched paths included; only
/// `POST /users` and `POST /auth/login` are exempt. Layers, innermost first:
/// - Request timeout: 30 seconds for CRUD routes, the provider timeout plus
///   [`AI_TIMEOUT_MARGIN_SECONDS`] for `/openai/*`
/// - Access guard
/// - TraceLayer for request logging
/// - CORS (outermost, so preflights are answered before the guard)
pub fn build_routes(state: Arc<AppState>) -> Router {
    let guard = state.guard.clone();

    let auth_routes = Router::new()
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/profile", get(auth_handler::profile));

    let user_routes = Router::new()
        .route("/users", post(user_handler::register).get(user_handler::list))
        .route("/users/search", post(user_handler::search))
        .route("/users/email/:email", get(user_handler::get_by_email))
        .route("/users/mobile/:mobile", get(user_handler::get_by_mobile))
        .route(
            "/users/:id",
            get(user_handler::get_by_id)
                .put(user_handler::update)
                .delete(user_handler::delete),
        );

    let topic_routes = Router::new()
        .route("/topics", post(topic_handler::create).get(topic_handler::list))
        .route("/topics/search", post(topic_handler::search))
        .route("/topics/name/:topic_name", get(topic_handler::get_by_name))
        .route(
            "/topics/:id",
            get(topic_handler::get)
                .put(topic_handler::update)
                .delete(topic_handler::delete),
        );

    let plan_routes = Router::new()
        .route(
            "/learning-plans",
            post(learning_plan_handler::create).get(learning_plan_handler::list),
        )
        .route(
            "/learning-plans/user/:user_id",
            get(learning_plan_handler::list_for_user),
        )
        .route(
            "/learning-plans/:id",
            get(learning_plan_handler::get)
                .put(learning_plan_handler::update)
                .delete(learning_plan_handler::delete),
        )
        .route(
            "/learning-plans/:id/phases/status",
            patch(learning_plan_handler::update_phase_status),
        )
        .route(
            "/learning-plans/:id/topics/status",
            patch(learning_plan_handler::update_topic_status),
        );

    let openai_routes = Router::new()
        .route("/openai/chat", post(openai_handler::chat))
        .route("/openai/text", post(openai_handler::text))
        .route("/openai/embedding", post(openai_handler::embedding))
        .route("/openai/models", get(openai_handler::models))
        .route("/openai/json", post(openai_handler::generate_json))
        .route("/openai/json/validate", post(openai_handler::validate_json));

    let ai_timeout =
        Duration::from_secs(state.config.openai.timeout_seconds + AI_TIMEOUT_MARGIN_SECONDS);

    let crud_routes = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(topic_routes)
        .merge(plan_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)));

    let openai_routes = openai_routes.layer(TimeoutLayer::new(ai_timeout));

    Router::new()
        .merge(crud_routes)
        .merge(openai_routes)
        .with_state(state)
        .layer(middleware::from_fn_with_state(guard, require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Any origin, echoed back, with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
