use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{Badge, DailyActivity, StreakStats, UserStreak};

use crate::ResultExt;

pub(super) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(FromRow)]
pub(super) struct UserStreakRow {
    pub user_id: String,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_post_date: Option<String>,
    pub streak_start_date: Option<String>,
    pub level: i64,
    pub experience: i64,
    pub total_blogs: i64,
    pub total_words: i64,
    pub streak_freezes_used: i64,
    pub max_streak_freezes_allowed: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
pub(super) struct BadgeRow {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

impl BadgeRow {
    pub fn into_badge(self) -> Badge {
        Badge::restore(self.name, self.description, self.icon, self.unlocked_at)
    }
}

#[derive(FromRow)]
pub(super) struct DailyActivityRow {
    pub user_id: String,
    pub activity_date: String,
    pub blogs_posted: i64,
    pub streak_day: i64,
}

impl DailyActivityRow {
    pub fn try_into_activity(self) -> Result<DailyActivity, DomainError> {
        Ok(DailyActivity::new(
            parse_date(&self.activity_date, "activity_date")?,
            to_u32(self.blogs_posted, "blogs_posted")?,
            to_u32(self.streak_day, "streak_day")?,
        ))
    }
}

impl UserStreakRow {
    pub fn try_into_record(
        self,
        badges: Vec<Badge>,
        activity: Vec<DailyActivity>,
    ) -> Result<UserStreak, DomainError> {
        let last_post_date = self
            .last_post_date
            .as_deref()
            .map(|s| parse_date(s, "last_post_date"))
            .transpose()?;
        let streak_start_date = self
            .streak_start_date
            .as_deref()
            .map(|s| parse_date(s, "streak_start_date"))
            .transpose()?;

        let stats = StreakStats {
            total_blogs: to_u64(self.total_blogs, "total_blogs")?,
            total_words: to_u64(self.total_words, "total_words")?,
            streak_freezes_used: to_u32(self.streak_freezes_used, "streak_freezes_used")?,
            max_streak_freezes_allowed: to_u32(
                self.max_streak_freezes_allowed,
                "max_streak_freezes_allowed",
            )?,
        };

        Ok(UserStreak::restore(
            UserId::from_string(&self.user_id),
            to_u32(self.current_streak, "current_streak")?,
            to_u32(self.longest_streak, "longest_streak")?,
            last_post_date,
            streak_start_date,
            to_u32(self.level, "level")?,
            to_u64(self.experience, "experience")?,
            badges,
            activity,
            stats,
            self.version,
            self.created_at,
            self.updated_at,
        ))
    }
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("Invalid {} '{}': {}", field, value, e))
        .to_repo_err()
}

fn to_u32(value: i64, field: &str) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| format!("Column {} out of range: {}", field, value))
        .to_repo_err()
}

fn to_u64(value: i64, field: &str) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| format!("Column {} out of range: {}", field, value))
        .to_repo_err()
}

/// SQLite stores INTEGER as i64
pub(super) fn to_i64(value: u64, field: &str) -> Result<i64, DomainError> {
    i64::try_from(value)
        .map_err(|_| format!("Value for {} too large: {}", field, value))
        .to_repo_err()
}
