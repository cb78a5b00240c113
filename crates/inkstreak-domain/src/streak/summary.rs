use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::UserStreak;
use super::day;
use super::value_objects::{Badge, StreakStats, StreakStatus};
use crate::shared::UserId;

/// Dashboard view of a user's progression at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub user_id: UserId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level: u32,
    pub experience: u64,
    pub next_level_xp: u64,
    /// Percentage in `0.0..=100.0`
    pub current_level_progress: f64,
    /// Distinct active days in the current Sunday-start week
    pub weekly_progress: u32,
    pub streak_status: StreakStatus,
    pub badges: Vec<Badge>,
    pub stats: StreakStats,
    pub freezes_remaining: u32,
    pub last_post_date: Option<NaiveDate>,
    pub streak_start_date: Option<NaiveDate>,
}

impl StreakSummary {
    pub fn project(record: &UserStreak, now: DateTime<Utc>) -> Self {
        let next_level_xp = record.next_level_xp();
        let current_level_progress =
            (record.experience() as f64 / next_level_xp as f64 * 100.0).min(100.0);

        let today = day::calendar_day(now);
        let week_start = day::week_start(today);
        let weekly_progress = record
            .daily_activity()
            .iter()
            .filter(|entry| entry.date >= week_start && entry.date <= today && entry.is_active())
            .count() as u32;

        Self {
            user_id: record.user_id().clone(),
            current_streak: record.current_streak(),
            longest_streak: record.longest_streak(),
            level: record.level(),
            experience: record.experience(),
            next_level_xp,
            current_level_progress,
            weekly_progress,
            streak_status: StreakStatus::from_streak(record.current_streak()),
            badges: record.badges().to_vec(),
            stats: record.stats().clone(),
            freezes_remaining: record.stats().freezes_remaining(),
            last_post_date: record.last_post_date(),
            streak_start_date: record.streak_start_date(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::{DailyActivity, StreakEngine};
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(level: u32, experience: u64, activity: Vec<DailyActivity>) -> UserStreak {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        UserStreak::restore(
            UserId::from_string("u1"),
            2,
            9,
            Some(date(2024, 3, 13)),
            Some(date(2024, 3, 12)),
            level,
            experience,
            Vec::new(),
            activity,
            StreakStats::default(),
            1,
            now,
            now,
        )
    }

    #[test]
    fn test_weekly_progress_counts_days_since_sunday() {
        // 2024-03-14 is a Thursday; the week started on Sunday 2024-03-10
        let activity = vec![
            DailyActivity::new(date(2024, 3, 9), 3, 1),
            DailyActivity::new(date(2024, 3, 10), 1, 1),
            DailyActivity::new(date(2024, 3, 12), 2, 1),
            DailyActivity::new(date(2024, 3, 13), 1, 2),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 0).unwrap();

        let summary = StreakSummary::project(&record(1, 0, activity), now);

        assert_eq!(summary.weekly_progress, 3);
        assert_eq!(summary.streak_status, StreakStatus::GettingStarted);
        assert_eq!(summary.longest_streak, 9);
    }

    #[test]
    fn test_level_progress_is_capped() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 0).unwrap();

        let halfway = StreakSummary::project(&record(2, 100, Vec::new()), now);
        assert_eq!(halfway.next_level_xp, 200);
        assert!((halfway.current_level_progress - 50.0).abs() < f64::EPSILON);

        let overflow = StreakSummary::project(&record(1, 150, Vec::new()), now);
        assert!((overflow.current_level_progress - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_after_posts() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let mut streak = UserStreak::new(UserId::from_string("u2"), 2, start);
        for offset in 0..3 {
            let (next, _) = StreakEngine::record_post(&streak, start + Duration::days(offset), 0);
            streak = next;
        }

        let summary = StreakSummary::project(&streak, start + Duration::days(2));

        assert_eq!(summary.current_streak, 3);
        assert_eq!(summary.weekly_progress, 3);
        assert_eq!(summary.experience, 30);
        assert_eq!(summary.freezes_remaining, 2);
        assert_eq!(summary.stats.total_blogs, 3);
    }
}
