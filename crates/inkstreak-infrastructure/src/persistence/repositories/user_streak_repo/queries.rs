use std::collections::HashMap;

use super::types::{BadgeRow, DailyActivityRow, UserStreakRow};
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{Badge, DailyActivity, UserStreak};

impl super::SqliteUserStreakRepository {
    pub(super) async fn find_by_user_id_impl(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserStreak>, DomainError> {
        let query = format!("{} WHERE user_id = ?1", Self::SELECT_QUERY);
        let row: Option<UserStreakRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(&query).bind(user_id.as_str()),
                "Find user streak by user ID",
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let badges: Vec<BadgeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(
                    r#"
                    SELECT user_id, name, description, icon, unlocked_at
                    FROM streak_badges
                    WHERE user_id = ?1
                    ORDER BY unlocked_at ASC, rowid ASC
                    "#,
                )
                .bind(user_id.as_str()),
                "List badges by user ID",
            )
            .await?;

        let activity: Vec<DailyActivityRow> = self
            .base
            .fetch_all(
                sqlx::query_as(
                    r#"
                    SELECT user_id, activity_date, blogs_posted, streak_day
                    FROM daily_activity
                    WHERE user_id = ?1
                    ORDER BY activity_date ASC
                    "#,
                )
                .bind(user_id.as_str()),
                "List daily activity by user ID",
            )
            .await?;

        let badges = badges.into_iter().map(BadgeRow::into_badge).collect();
        let activity = activity
            .into_iter()
            .map(DailyActivityRow::try_into_activity)
            .collect::<Result<Vec<_>, _>>()?;

        row.try_into_record(badges, activity).map(Some)
    }

    pub(super) async fn find_all_impl(&self) -> Result<Vec<UserStreak>, DomainError> {
        let query = format!("{} ORDER BY user_id ASC", Self::SELECT_QUERY);
        let rows: Vec<UserStreakRow> = self
            .base
            .fetch_all(sqlx::query_as(&query), "List all user streaks")
            .await?;

        let badge_rows: Vec<BadgeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(
                    r#"
                    SELECT user_id, name, description, icon, unlocked_at
                    FROM streak_badges
                    ORDER BY unlocked_at ASC, rowid ASC
                    "#,
                ),
                "List all badges",
            )
            .await?;

        let activity_rows: Vec<DailyActivityRow> = self
            .base
            .fetch_all(
                sqlx::query_as(
                    r#"
                    SELECT user_id, activity_date, blogs_posted, streak_day
                    FROM daily_activity
                    ORDER BY activity_date ASC
                    "#,
                ),
                "List all daily activity",
            )
            .await?;

        let mut badges_by_user: HashMap<String, Vec<Badge>> = HashMap::new();
        for row in badge_rows {
            badges_by_user
                .entry(row.user_id.clone())
                .or_default()
                .push(row.into_badge());
        }

        let mut activity_by_user: HashMap<String, Vec<DailyActivity>> = HashMap::new();
        for row in activity_rows {
            let user_id = row.user_id.clone();
            activity_by_user
                .entry(user_id)
                .or_default()
                .push(row.try_into_activity()?);
        }

        rows.into_iter()
            .map(|row| {
                let badges = badges_by_user.remove(&row.user_id).unwrap_or_default();
                let activity = activity_by_user.remove(&row.user_id).unwrap_or_default();
                row.try_into_record(badges, activity)
            })
            .collect()
    }
}
