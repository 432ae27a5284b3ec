//! Learning Planner service entry point.
//!
//! Loads configuration, connects to Postgres, applies the bundled schema and
//! serves the HTTP API until SIGINT/SIGTERM.

use planner_service::config::Config;
use planner_service::observability;
use planner_service::repositories::{PgLearningPlanStore, PgTopicStore, PgUserStore};
use planner_service::routes::{self, AppState};
use planner_service::services::openai_client::OpenAiClient;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_tracing();

    info!("Starting Learning Planner service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        openai_model = %config.openai.model,
        "Configuration loaded successfully"
    );

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            error!("Failed to apply migrations: {}", e);
            e
        })?;

    info!("Database connection established");

    let completion_api = OpenAiClient::new(&config.openai).map_err(|e| {
        error!("Failed to build completion API client: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let state = Arc::new(AppState::new(
        config,
        Arc::new(PgUserStore::new(db_pool.clone())),
        Arc::new(PgTopicStore::new(db_pool.clone())),
        Arc::new(PgLearningPlanStore::new(db_pool)),
        Arc::new(completion_api),
    ));

    let app = routes::build_routes(state);

    info!("Learning Planner listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Learning Planner shutdown complete");

    Ok(())
}

/// Returns when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
