use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::day;
use super::value_objects::{merge_by_date, Badge, DailyActivity, StreakStats};
use crate::shared::UserId;

/// Gamification state of one user.
///
/// Only [`StreakEngine`](super::StreakEngine) produces modified copies; the
/// crate-private mutators below exist for it alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStreak {
    user_id: UserId,
    current_streak: u32,
    longest_streak: u32,
    last_post_date: Option<NaiveDate>,
    streak_start_date: Option<NaiveDate>,
    level: u32,
    experience: u64,
    badges: Vec<Badge>,
    daily_activity: Vec<DailyActivity>,
    stats: StreakStats,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserStreak {
    pub const INITIAL_LEVEL: u32 = 1;
    pub const XP_PER_LEVEL: u64 = 100;

    pub fn new(user_id: UserId, max_streak_freezes_allowed: u32, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_post_date: None,
            streak_start_date: None,
            level: Self::INITIAL_LEVEL,
            experience: 0,
            badges: Vec::new(),
            daily_activity: Vec::new(),
            stats: StreakStats::with_freeze_allowance(max_streak_freezes_allowed),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from persisted state. Activity rows are merged by date and
    /// sorted, and badges keep only the first occurrence of each name.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        user_id: UserId,
        current_streak: u32,
        longest_streak: u32,
        last_post_date: Option<NaiveDate>,
        streak_start_date: Option<NaiveDate>,
        level: u32,
        experience: u64,
        badges: Vec<Badge>,
        daily_activity: Vec<DailyActivity>,
        stats: StreakStats,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut unique_badges: Vec<Badge> = Vec::with_capacity(badges.len());
        for badge in badges {
            if !unique_badges.iter().any(|b| b.name() == badge.name()) {
                unique_badges.push(badge);
            }
        }

        Self {
            user_id,
            current_streak,
            longest_streak: longest_streak.max(current_streak),
            last_post_date,
            streak_start_date,
            level: level.max(Self::INITIAL_LEVEL),
            experience,
            badges: unique_badges,
            daily_activity: merge_by_date(daily_activity),
            stats,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_post_date(&self) -> Option<NaiveDate> {
        self.last_post_date
    }

    pub fn streak_start_date(&self) -> Option<NaiveDate> {
        self.streak_start_date
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Experience required to leave the current level
    pub fn next_level_xp(&self) -> u64 {
        u64::from(self.level).saturating_mul(Self::XP_PER_LEVEL)
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|b| b.name() == name)
    }

    pub fn daily_activity(&self) -> &[DailyActivity] {
        &self.daily_activity
    }

    pub fn activity_on(&self, date: NaiveDate) -> Option<&DailyActivity> {
        self.daily_activity
            .binary_search_by_key(&date, |entry| entry.date)
            .ok()
            .map(|idx| &self.daily_activity[idx])
    }

    pub fn stats(&self) -> &StreakStats {
        &self.stats
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Called by persistence after a successful versioned write
    pub fn mark_persisted(&mut self, version: i64) {
        self.version = version;
    }

    pub(crate) fn start_streak(&mut self, today: NaiveDate) {
        self.current_streak = 1;
        self.longest_streak = self.longest_streak.max(1);
        self.streak_start_date = Some(today);
    }

    pub(crate) fn extend_streak(&mut self) {
        self.current_streak += 1;
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    pub(crate) fn set_last_post_date(&mut self, date: NaiveDate) {
        self.last_post_date = Some(date);
    }

    /// Count one post on `today` and drop entries outside the rolling window
    pub(crate) fn log_activity(&mut self, today: NaiveDate) {
        let streak_day = self.current_streak;
        match self
            .daily_activity
            .binary_search_by_key(&today, |entry| entry.date)
        {
            Ok(idx) => {
                let entry = &mut self.daily_activity[idx];
                entry.blogs_posted = entry.blogs_posted.saturating_add(1);
                entry.streak_day = streak_day;
            }
            Err(idx) => self
                .daily_activity
                .insert(idx, DailyActivity::new(today, 1, streak_day)),
        }

        let cutoff = day::retention_cutoff(today);
        self.daily_activity.retain(|entry| entry.date >= cutoff);
    }

    pub(crate) fn add_experience(&mut self, amount: u64) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Advance `levels` levels, crediting `bonus` experience for each
    pub(crate) fn level_up(&mut self, levels: u32, bonus: u64) {
        self.level = self.level.saturating_add(levels);
        self.experience = self
            .experience
            .saturating_add(bonus.saturating_mul(u64::from(levels)));
    }

    pub(crate) fn count_post(&mut self, word_count: u64) {
        self.stats.total_blogs += 1;
        self.stats.total_words = self.stats.total_words.saturating_add(word_count);
    }

    pub(crate) fn push_badge(&mut self, badge: Badge) {
        self.badges.push(badge);
    }

    pub(crate) fn consume_freeze(&mut self) {
        self.stats.streak_freezes_used += 1;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
