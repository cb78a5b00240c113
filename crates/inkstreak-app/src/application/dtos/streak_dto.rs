use serde::{Deserialize, Serialize};

use inkstreak_domain::streak::{
    Badge, CalendarDay, CalendarView, FreezeOutcome, PostOutcome, StreakStats, StreakSummary,
    UserStreak,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeDto {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: String, // RFC 3339
}

impl From<&Badge> for BadgeDto {
    fn from(badge: &Badge) -> Self {
        Self {
            name: badge.name().to_string(),
            description: badge.description().to_string(),
            icon: badge.icon().to_string(),
            unlocked_at: badge.unlocked_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsDto {
    pub total_blogs: u64,
    pub total_words: u64,
    pub streak_freezes_used: u32,
    pub max_streak_freezes_allowed: u32,
}

impl From<&StreakStats> for StatsDto {
    fn from(stats: &StreakStats) -> Self {
        Self {
            total_blogs: stats.total_blogs,
            total_words: stats.total_words,
            streak_freezes_used: stats.streak_freezes_used,
            max_streak_freezes_allowed: stats.max_streak_freezes_allowed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecordedDto {
    pub user_id: String,
    pub current_streak: u32,
    pub level: u32,
    pub experience: u64,
    pub experience_gained: u64,
    pub levels_gained: u32,
    pub new_badges: Vec<BadgeDto>,
}

impl PostRecordedDto {
    pub fn from_outcome(record: &UserStreak, outcome: &PostOutcome) -> Self {
        Self {
            user_id: record.user_id().to_string(),
            current_streak: outcome.current_streak,
            level: outcome.level,
            experience: record.experience(),
            experience_gained: outcome.experience_gained,
            levels_gained: outcome.levels_gained,
            new_badges: outcome.new_badges.iter().map(BadgeDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeResultDto {
    pub user_id: String,
    pub message: String,
    pub freezes_remaining: u32,
    pub current_streak: u32,
}

impl FreezeResultDto {
    pub fn from_outcome(record: &UserStreak, outcome: &FreezeOutcome) -> Self {
        Self {
            user_id: record.user_id().to_string(),
            message: "Streak freeze used successfully".to_string(),
            freezes_remaining: outcome.freezes_remaining,
            current_streak: outcome.current_streak,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummaryDto {
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level: u32,
    pub experience: u64,
    pub next_level_xp: u64,
    pub current_level_progress: f64, // 0.0 - 100.0
    pub weekly_progress: u32,
    pub streak_status: String,
    pub streak_message: String,
    pub badges: Vec<BadgeDto>,
    pub stats: StatsDto,
    pub freezes_remaining: u32,
    pub last_post_date: Option<String>, // YYYY-MM-DD
    pub streak_start_date: Option<String>,
}

impl From<StreakSummary> for StreakSummaryDto {
    fn from(summary: StreakSummary) -> Self {
        Self {
            user_id: summary.user_id.to_string(),
            current_streak: summary.current_streak,
            longest_streak: summary.longest_streak,
            level: summary.level,
            experience: summary.experience,
            next_level_xp: summary.next_level_xp,
            current_level_progress: summary.current_level_progress,
            weekly_progress: summary.weekly_progress,
            streak_status: summary.streak_status.as_str().to_string(),
            streak_message: summary.streak_status.message().to_string(),
            badges: summary.badges.iter().map(BadgeDto::from).collect(),
            stats: StatsDto::from(&summary.stats),
            freezes_remaining: summary.freezes_remaining,
            last_post_date: summary
                .last_post_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            streak_start_date: summary
                .streak_start_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDayDto {
    pub date: String, // YYYY-MM-DD
    pub blogs_posted: u32,
    pub streak_day: u32,
    pub level: u8, // 0 - 4
}

impl From<&CalendarDay> for CalendarDayDto {
    fn from(day: &CalendarDay) -> Self {
        Self {
            date: day.date.format(DATE_FORMAT).to_string(),
            blogs_posted: day.blogs_posted,
            streak_day: day.streak_day,
            level: day.activity_level.value(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDto {
    pub user_id: String,
    pub days: Vec<CalendarDayDto>,
    pub total_days: u32,
    pub active_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl CalendarDto {
    pub fn from_view(user_id: &str, view: &CalendarView) -> Self {
        Self {
            user_id: user_id.to_string(),
            days: view.days.iter().map(CalendarDayDto::from).collect(),
            total_days: view.total_days,
            active_days: view.active_days,
            current_streak: view.current_streak,
            longest_streak: view.longest_streak,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub rank: u32,
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub level: u32,
    pub experience: u64,
    pub streak_status: String,
}
