use chrono::{DateTime, Utc};
use log::info;

use crate::application::dtos::StreakSummaryDto;
use inkstreak_domain::streak::{StreakSummary, UserStreak};

pub fn get_summary(record: &UserStreak, now: DateTime<Utc>) -> StreakSummaryDto {
    let dto = StreakSummaryDto::from(StreakSummary::project(record, now));

    info!(
        "[streak] get_summary user_id={} current={} longest={} level={} weekly={}",
        dto.user_id, dto.current_streak, dto.longest_streak, dto.level, dto.weekly_progress
    );

    dto
}
