use inkstreak_domain::shared::DomainError;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use std::sync::Arc;

/// Shared pool handle plus error mapping for SQLite repositories.
///
/// Every call takes a short `context` that ends up in the error message.
#[derive(Clone)]
pub struct SqliteRepositoryBase {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositoryBase {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn fetch_optional<'q, O>(
        &self,
        query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Option<O>, DomainError>
    where
        O: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        query
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_error(context, e))
    }

    pub async fn fetch_all<'q, O>(
        &self,
        query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Vec<O>, DomainError>
    where
        O: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        query
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_error(context, e))
    }
}

pub(crate) fn map_error(context: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::PoolTimedOut => DomainError::Timeout(format!("{}: pool timed out", context)),
        other => DomainError::Repository(format!("{}: {}", context, other)),
    }
}
