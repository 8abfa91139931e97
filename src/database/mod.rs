use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config;

pub mod models;

/// Errors from the database handle
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide database handle.
///
/// Created once at startup and injected into every registry, so tests can
/// point registries at a substitute database instead of a shared ambient
/// singleton. Cloning is cheap; the underlying pool is shared.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect using `DATABASE_URL` and run pending migrations.
    pub async fn connect() -> Result<Self, DbError> {
        let url =
            std::env::var("DATABASE_URL").map_err(|_| DbError::ConfigMissing("DATABASE_URL"))?;
        let db_config = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
            .connect(&url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Connected to database");
        Ok(Self { pool })
    }

    /// Connect with a fixed backoff, retrying indefinitely. Startup blocks
    /// on the database instead of exiting.
    pub async fn connect_with_retry() -> Self {
        let retry_secs = config::config().database.connect_retry_secs;
        loop {
            match Self::connect().await {
                Ok(db) => return db,
                Err(e) => {
                    warn!("Database connection failed: {}. Retrying in {}s", e, retry_secs);
                    tokio::time::sleep(Duration::from_secs(retry_secs)).await;
                }
            }
        }
    }

    /// Wrap an existing pool, e.g. one pointed at a test database.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the database to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
