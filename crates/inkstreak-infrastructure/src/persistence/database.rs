use inkstreak_domain::shared::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

use crate::config::AppConfig;
use crate::ResultExt;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_path: &str) -> Result<Self, DomainError> {
        Self::with_options(db_path, 5, Duration::from_secs(10)).await
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let db_path = config.database_path.to_str().ok_or_else(|| {
            DomainError::Infrastructure(format!(
                "Database path is not valid UTF-8: {}",
                config.database_path.display()
            ))
        })?;
        Self::with_options(
            db_path,
            config.db_max_connections,
            config.timeouts.db_query,
        )
        .await
    }

    async fn with_options(
        db_path: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let path = Path::new(db_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).to_infra_err()?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .to_infra_err()?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database, mostly for tests and dry runs
    pub async fn in_memory() -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .to_infra_err()?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .to_infra_err()?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
