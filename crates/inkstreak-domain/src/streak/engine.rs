use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::aggregate::UserStreak;
use super::day;
use super::value_objects::{Badge, BadgeKind};
use crate::shared::DomainError;

/// Result of crediting one post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostOutcome {
    pub current_streak: u32,
    pub level: u32,
    pub experience_gained: u64,
    pub levels_gained: u32,
    /// Badges unlocked by this post only
    pub new_badges: Vec<Badge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeOutcome {
    pub freezes_remaining: u32,
    pub current_streak: u32,
}

/// Streak and progression rules.
///
/// Every operation takes the current record by reference and returns a new
/// record; callers persist the returned value or drop it.
pub struct StreakEngine;

impl StreakEngine {
    pub const MIN_EXPERIENCE_PER_POST: u64 = 10;
    pub const EXPERIENCE_PER_HUNDRED_WORDS: u64 = 5;
    pub const LEVEL_UP_BONUS: u64 = 50;
    /// Largest word count a single post may claim
    pub const MAX_WORDS_PER_POST: u64 = 1_000_000;

    /// Experience earned by a post of `word_count` words
    pub fn experience_for(word_count: u64) -> u64 {
        (word_count / 100 * Self::EXPERIENCE_PER_HUNDRED_WORDS).max(Self::MIN_EXPERIENCE_PER_POST)
    }

    /// Credit a post published at `posted_at`.
    pub fn record_post(
        record: &UserStreak,
        posted_at: DateTime<Utc>,
        word_count: u64,
    ) -> (UserStreak, PostOutcome) {
        let mut next = record.clone();
        let today = day::calendar_day(posted_at);
        let yesterday = today - Duration::days(1);

        match next.last_post_date() {
            // A freeze can set last_post_date before any streak exists
            None => next.start_streak(today),
            Some(_) if next.current_streak() == 0 => next.start_streak(today),
            Some(last) if last == today => {
                debug!(
                    "[streak] user_id={} already credited for {}",
                    next.user_id(),
                    today
                );
            }
            Some(last) if last == yesterday => next.extend_streak(),
            Some(last) => {
                info!(
                    "[streak] user_id={} streak broken last_post={} today={} previous={}",
                    next.user_id(),
                    last,
                    today,
                    next.current_streak()
                );
                next.start_streak(today);
            }
        }

        next.set_last_post_date(today);
        next.log_activity(today);

        let experience_gained = Self::experience_for(word_count);
        next.add_experience(experience_gained);
        next.count_post(word_count);

        let levels_gained = Self::apply_level_ups(&mut next);
        let new_badges = Self::unlock_badges(&mut next, posted_at);
        next.touch(posted_at);

        let outcome = PostOutcome {
            current_streak: next.current_streak(),
            level: next.level(),
            experience_gained,
            levels_gained,
            new_badges,
        };

        info!(
            "[streak] record_post user_id={} day={} streak={} longest={} level={} xp=+{} badges={}",
            next.user_id(),
            today,
            outcome.current_streak,
            next.longest_streak(),
            outcome.level,
            outcome.experience_gained,
            outcome.new_badges.len()
        );

        (next, outcome)
    }

    /// Spend one freeze credit so that `now`'s day counts as posted.
    pub fn use_streak_freeze(
        record: &UserStreak,
        now: DateTime<Utc>,
    ) -> Result<(UserStreak, FreezeOutcome), DomainError> {
        let stats = record.stats();
        if stats.streak_freezes_used >= stats.max_streak_freezes_allowed {
            return Err(DomainError::FreezeExhausted(format!(
                "user {} has used {} of {} streak freezes",
                record.user_id(),
                stats.streak_freezes_used,
                stats.max_streak_freezes_allowed
            )));
        }

        let mut next = record.clone();
        next.set_last_post_date(day::calendar_day(now));
        next.consume_freeze();
        next.touch(now);

        let outcome = FreezeOutcome {
            freezes_remaining: next.stats().freezes_remaining(),
            current_streak: next.current_streak(),
        };

        info!(
            "[streak] freeze used user_id={} remaining={} streak={}",
            next.user_id(),
            outcome.freezes_remaining,
            outcome.current_streak
        );

        Ok((next, outcome))
    }

    /// Each level-up raises the threshold by `XP_PER_LEVEL` and credits
    /// `LEVEL_UP_BONUS`, so every level closes the gap by their difference.
    fn apply_level_ups(record: &mut UserStreak) -> u32 {
        let threshold = record.next_level_xp();
        if record.experience() < threshold {
            return 0;
        }

        let gap_per_level = UserStreak::XP_PER_LEVEL - Self::LEVEL_UP_BONUS;
        let needed = (record.experience() - threshold) / gap_per_level + 1;
        let headroom = u32::MAX - record.level();
        let levels = u32::try_from(needed).unwrap_or(u32::MAX).min(headroom);

        record.level_up(levels, Self::LEVEL_UP_BONUS);
        levels
    }

    fn unlock_badges(record: &mut UserStreak, unlocked_at: DateTime<Utc>) -> Vec<Badge> {
        let mut unlocked = Vec::new();
        for kind in BadgeKind::ALL {
            if record.has_badge(kind.name()) {
                continue;
            }
            if kind.is_earned(record.current_streak(), record.level()) {
                let badge = kind.unlock(unlocked_at);
                record.push_badge(badge.clone());
                unlocked.push(badge);
            }
        }
        unlocked
    }
}
