mod mutations;
mod queries;
mod types;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{UserStreak, UserStreakRepository};

/// `user_streaks` plus its `streak_badges` and `daily_activity` children
pub struct SqliteUserStreakRepository {
    base: SqliteRepositoryBase,
}

impl SqliteUserStreakRepository {
    const SELECT_QUERY: &'static str = r#"
            SELECT
                user_id, current_streak, longest_streak, last_post_date, streak_start_date,
                level, experience, total_blogs, total_words, streak_freezes_used,
                max_streak_freezes_allowed, version, created_at, updated_at
            FROM user_streaks
        "#;

    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl UserStreakRepository for SqliteUserStreakRepository {
    async fn create(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        self.create_impl(record).await
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserStreak>, DomainError> {
        self.find_by_user_id_impl(user_id).await
    }

    async fn save(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        self.save_impl(record).await
    }

    async fn find_all(&self) -> Result<Vec<UserStreak>, DomainError> {
        self.find_all_impl().await
    }

    async fn delete(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.delete_impl(user_id).await
    }
}
