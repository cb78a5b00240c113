use log::info;

use crate::application::dtos::LeaderboardEntryDto;
use inkstreak_domain::streak::{StreakStatus, UserStreak};

pub fn rank(mut records: Vec<UserStreak>, limit: Option<usize>) -> Vec<LeaderboardEntryDto> {
    records.sort_by(|a, b| {
        b.current_streak()
            .cmp(&a.current_streak())
            .then_with(|| b.longest_streak().cmp(&a.longest_streak()))
            .then_with(|| a.user_id().cmp(b.user_id()))
    });

    let total = records.len();
    let entries: Vec<LeaderboardEntryDto> = records
        .iter()
        .take(limit.unwrap_or(total))
        .zip(1u32..)
        .map(|(record, rank)| LeaderboardEntryDto {
            rank,
            user_id: record.user_id().to_string(),
            current_streak: record.current_streak(),
            longest_streak: record.longest_streak(),
            level: record.level(),
            experience: record.experience(),
            streak_status: StreakStatus::from_streak(record.current_streak())
                .as_str()
                .to_string(),
        })
        .collect();

    info!(
        "[streak] leaderboard total_users={} returned={}",
        total,
        entries.len()
    );

    entries
}
