use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::dtos::{CalendarDto, LeaderboardEntryDto, StreakSummaryDto};
use crate::application::services::Clock;
use crate::application::ResultExt;
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{day, UserStreak, UserStreakRepository};

mod calendar;
mod leaderboard;
mod summary;

#[cfg(test)]
mod tests;

/// Read-only views over stored streak records
pub struct StreakQueries {
    streak_repo: Arc<dyn UserStreakRepository>,
    clock: Arc<dyn Clock>,
}

impl StreakQueries {
    pub fn new(streak_repo: Arc<dyn UserStreakRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { streak_repo, clock }
    }

    /// Dashboard summary for one user
    pub async fn summary(&self, user_id: &str) -> Result<StreakSummaryDto, DomainError> {
        let record = self.load(user_id).await?;
        Ok(summary::get_summary(&record, self.clock.now()))
    }

    /// 365-day calendar ending at `reference_date` (YYYY-MM-DD), today by default
    pub async fn calendar(
        &self,
        user_id: &str,
        reference_date: Option<&str>,
    ) -> Result<CalendarDto, DomainError> {
        let reference_date = match reference_date {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .to_invalid_input("reference date must be YYYY-MM-DD")?,
            None => day::calendar_day(self.clock.now()),
        };
        let record = self.load(user_id).await?;
        Ok(calendar::get_calendar(&record, reference_date))
    }

    /// Users ranked by current streak, then longest streak, then user id
    pub async fn leaderboard(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntryDto>, DomainError> {
        if limit == Some(0) {
            return Err(DomainError::InvalidInput(
                "limit must be greater than zero".to_string(),
            ));
        }
        let records = self.streak_repo.find_all().await?;
        Ok(leaderboard::rank(records, limit))
    }

    async fn load(&self, user_id: &str) -> Result<UserStreak, DomainError> {
        let user_id = UserId::from_string(user_id.trim());
        self.streak_repo
            .find_by_user_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }
}
