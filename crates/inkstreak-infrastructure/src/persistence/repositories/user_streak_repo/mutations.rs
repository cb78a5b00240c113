use sqlx::{QueryBuilder, Sqlite, Transaction};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::types::{format_date, to_i64};
use crate::persistence::repository_base::map_error;
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::UserStreak;

impl super::SqliteUserStreakRepository {
    pub(super) async fn create_impl(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| map_error("Begin transaction", e))?;

        let query = r#"
            INSERT INTO user_streaks (
                user_id, current_streak, longest_streak, last_post_date, streak_start_date,
                level, experience, total_blogs, total_words, streak_freezes_used,
                max_streak_freezes_allowed, version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?13)
        "#;

        let stats = record.stats();
        let result = sqlx::query(query)
            .bind(record.user_id().as_str())
            .bind(record.current_streak())
            .bind(record.longest_streak())
            .bind(record.last_post_date().map(format_date))
            .bind(record.streak_start_date().map(format_date))
            .bind(record.level())
            .bind(to_i64(record.experience(), "experience")?)
            .bind(to_i64(stats.total_blogs, "total_blogs")?)
            .bind(to_i64(stats.total_words, "total_words")?)
            .bind(stats.streak_freezes_used)
            .bind(stats.max_streak_freezes_allowed)
            .bind(record.created_at())
            .bind(record.updated_at())
            .execute(&mut *tx)
            .await;

        if let Err(e) = result {
            let duplicate = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.is_unique_violation()
            );
            if duplicate {
                return Err(DomainError::Validation(format!(
                    "Streak record already exists for user {}",
                    record.user_id()
                )));
            }
            return Err(map_error("Insert user streak", e));
        }

        Self::replace_children(&mut tx, record).await?;

        tx.commit()
            .await
            .map_err(|e| map_error("Commit transaction", e))?;

        info!(user_id = %record.user_id(), "Created streak record");

        let mut created = record.clone();
        created.mark_persisted(1);
        Ok(created)
    }

    pub(super) async fn save_impl(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        let start = Instant::now();
        let next_version = record.version() + 1;

        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| map_error("Begin transaction", e))?;

        let query = r#"
            UPDATE user_streaks SET
                current_streak = ?2,
                longest_streak = ?3,
                last_post_date = ?4,
                streak_start_date = ?5,
                level = ?6,
                experience = ?7,
                total_blogs = ?8,
                total_words = ?9,
                streak_freezes_used = ?10,
                max_streak_freezes_allowed = ?11,
                updated_at = ?12,
                version = ?13
            WHERE user_id = ?1 AND version = ?14
        "#;

        let stats = record.stats();
        let updated = sqlx::query(query)
            .bind(record.user_id().as_str())
            .bind(record.current_streak())
            .bind(record.longest_streak())
            .bind(record.last_post_date().map(format_date))
            .bind(record.streak_start_date().map(format_date))
            .bind(record.level())
            .bind(to_i64(record.experience(), "experience")?)
            .bind(to_i64(stats.total_blogs, "total_blogs")?)
            .bind(to_i64(stats.total_words, "total_words")?)
            .bind(stats.streak_freezes_used)
            .bind(stats.max_streak_freezes_allowed)
            .bind(record.updated_at())
            .bind(next_version)
            .bind(record.version())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_error("Update user streak", e))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| map_error("Rollback transaction", e))?;
            return Err(self.missing_or_stale(record).await);
        }

        Self::replace_children(&mut tx, record).await?;

        tx.commit()
            .await
            .map_err(|e| map_error("Commit transaction", e))?;

        debug!(
            user_id = %record.user_id(),
            version = next_version,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Saved streak record"
        );

        let mut saved = record.clone();
        saved.mark_persisted(next_version);
        Ok(saved)
    }

    pub(super) async fn delete_impl(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| map_error("Begin transaction", e))?;

        for query in [
            "DELETE FROM daily_activity WHERE user_id = ?1",
            "DELETE FROM streak_badges WHERE user_id = ?1",
            "DELETE FROM user_streaks WHERE user_id = ?1",
        ] {
            sqlx::query(query)
                .bind(user_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_error("Delete user streak", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_error("Commit transaction", e))?;

        info!(user_id = %user_id, "Deleted streak record");
        Ok(())
    }

    /// Rewrite the activity window and append badges not yet stored.
    async fn replace_children(
        tx: &mut Transaction<'_, Sqlite>,
        record: &UserStreak,
    ) -> Result<(), DomainError> {
        let user_id = record.user_id().as_str();

        sqlx::query("DELETE FROM daily_activity WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_error("Clear daily activity", e))?;

        if !record.daily_activity().is_empty() {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO daily_activity (user_id, activity_date, blogs_posted, streak_day) ",
            );
            builder.push_values(record.daily_activity(), |mut row, entry| {
                row.push_bind(user_id)
                    .push_bind(format_date(entry.date))
                    .push_bind(entry.blogs_posted)
                    .push_bind(entry.streak_day);
            });
            builder
                .build()
                .execute(&mut **tx)
                .await
                .map_err(|e| map_error("Insert daily activity", e))?;
        }

        // Badges are immutable: existing rows keep their original unlock time
        for badge in record.badges() {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO streak_badges (user_id, name, description, icon, unlocked_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(user_id)
            .bind(badge.name())
            .bind(badge.description())
            .bind(badge.icon())
            .bind(badge.unlocked_at())
            .execute(&mut **tx)
            .await
            .map_err(|e| map_error("Insert badge", e))?;
        }

        Ok(())
    }

    async fn missing_or_stale(&self, record: &UserStreak) -> DomainError {
        let stored: Result<Option<i64>, DomainError> = sqlx::query_scalar(
            "SELECT version FROM user_streaks WHERE user_id = ?1",
        )
        .bind(record.user_id().as_str())
        .fetch_optional(self.base.pool())
        .await
        .map_err(|e| map_error("Read stored version", e));

        match stored {
            Ok(Some(stored_version)) => {
                warn!(
                    user_id = %record.user_id(),
                    expected = record.version(),
                    stored = stored_version,
                    "Rejected stale streak write"
                );
                DomainError::Conflict(format!(
                    "Streak record for user {} changed concurrently (expected version {}, found {})",
                    record.user_id(),
                    record.version(),
                    stored_version
                ))
            }
            Ok(None) => DomainError::UserNotFound(record.user_id().to_string()),
            Err(e) => e,
        }
    }
}
