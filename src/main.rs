use people_crud::{
    AppState,
    config::{AppConfig, Env, StoreKind},
    create_router,
    error::ConfigError,
    repository::{InMemoryRepository, PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Initializes logging, configuration, the People store, and the HTTP server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging: the format follows APP_ENV, so configuration errors are logged too.
    dotenv::dotenv().ok();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "people_crud=debug,tower_http=info".into());

    match Env::from_env() {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    // 2. Configuration (fail-fast on missing or malformed settings).
    let config = AppConfig::load()
        .inspect_err(|e| tracing::error!("Invalid configuration: {}", e))?;

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Store selection.
    let repo: RepositoryState = match config.store {
        StoreKind::Postgres => {
            let db_url = config
                .db_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(db_url)
                .await
                .inspect_err(|e| tracing::error!("Failed to connect to Postgres: {}", e))?;
            Arc::new(PostgresRepository::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory People store; data is lost on exit.");
            Arc::new(InMemoryRepository::new())
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { repo, config });

    // 4. Server startup.
    let listener = TcpListener::bind(bind_addr.as_str()).await?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
