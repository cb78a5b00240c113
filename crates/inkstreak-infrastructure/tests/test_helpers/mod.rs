use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use inkstreak_infrastructure::persistence::repositories::SqliteUserStreakRepository;
use inkstreak_infrastructure::persistence::Database;

/// Fresh in-memory database with all migrations applied
pub async fn setup_in_memory_db() -> Database {
    let db = Database::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

pub async fn setup_repository() -> (Database, SqliteUserStreakRepository) {
    let db = setup_in_memory_db().await;
    let repo = SqliteUserStreakRepository::new(Arc::new(db.pool().clone()));
    (db, repo)
}

#[allow(dead_code)]
pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}
