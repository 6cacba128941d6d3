use std::sync::Arc;

use freeflow_db::{MemoryClient, PgClient, SharedClient};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The injected backend client (Postgres pool or in-process tables).
    pub client: SharedClient,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
}

/// Failures while wiring up the backend at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Database health check failed: {0}")]
    HealthCheck(#[source] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl AppState {
    pub fn new(client: SharedClient, config: ServerConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Build state for `config`, choosing the client from `DATABASE_URL`.
    ///
    /// `memory://` selects [`MemoryClient`]; anything else is treated as a
    /// Postgres URL, which is health-checked and migrated before use.
    pub async fn connect(config: ServerConfig) -> Result<Self, StartupError> {
        let client: SharedClient = if config.uses_memory_backend() {
            tracing::warn!("DATABASE_URL selects the in-memory backend; data is not persisted");
            Arc::new(MemoryClient::with_schema())
        } else {
            let pool = freeflow_db::create_pool(&config.database_url, config.db_max_connections)
                .await
                .map_err(StartupError::Connect)?;
            tracing::info!(max_connections = config.db_max_connections, "Database pool created");

            freeflow_db::health_check(&pool)
                .await
                .map_err(StartupError::HealthCheck)?;
            tracing::info!("Database health check passed");

            freeflow_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgClient::new(pool))
        };
        Ok(Self::new(client, config))
    }
}
