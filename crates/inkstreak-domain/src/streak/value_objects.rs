use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Posting activity of a single UTC calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub blogs_posted: u32,
    /// Value of `current_streak` at the day's latest post
    pub streak_day: u32,
}

impl DailyActivity {
    pub fn new(date: NaiveDate, blogs_posted: u32, streak_day: u32) -> Self {
        Self {
            date,
            blogs_posted,
            streak_day,
        }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, 0, 0)
    }

    pub fn is_active(&self) -> bool {
        self.blogs_posted > 0
    }
}

/// Collapse entries that share a date into one, sorted ascending by date.
///
/// `blogs_posted` is summed and the largest `streak_day` wins.
pub fn merge_by_date<I>(entries: I) -> Vec<DailyActivity>
where
    I: IntoIterator<Item = DailyActivity>,
{
    let mut merged: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();
    for entry in entries {
        merged
            .entry(entry.date)
            .and_modify(|existing| {
                existing.blogs_posted = existing.blogs_posted.saturating_add(entry.blogs_posted);
                existing.streak_day = existing.streak_day.max(entry.streak_day);
            })
            .or_insert(entry);
    }
    merged.into_values().collect()
}

/// Permanent achievement, unique by name per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    name: String,
    description: String,
    icon: String,
    unlocked_at: DateTime<Utc>,
}

impl Badge {
    pub fn restore(
        name: String,
        description: String,
        icon: String,
        unlocked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            description,
            icon,
            unlocked_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn unlocked_at(&self) -> DateTime<Utc> {
        self.unlocked_at
    }
}

/// What a badge rule measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeMetric {
    CurrentStreak,
    Level,
}

/// Built-in badge catalog, in award priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    WeekWarrior,
    MonthMaster,
    CenturyChampion,
    RisingStar,
    BlogVeteran,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 5] = [
        BadgeKind::WeekWarrior,
        BadgeKind::MonthMaster,
        BadgeKind::CenturyChampion,
        BadgeKind::RisingStar,
        BadgeKind::BlogVeteran,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::WeekWarrior => "Week Warrior",
            BadgeKind::MonthMaster => "Month Master",
            BadgeKind::CenturyChampion => "Century Champion",
            BadgeKind::RisingStar => "Rising Star",
            BadgeKind::BlogVeteran => "Blog Veteran",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeKind::WeekWarrior => "Blog for 7 consecutive days",
            BadgeKind::MonthMaster => "Blog for 30 consecutive days",
            BadgeKind::CenturyChampion => "Blog for 100 consecutive days",
            BadgeKind::RisingStar => "Reach level 5",
            BadgeKind::BlogVeteran => "Reach level 10",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeKind::WeekWarrior => "🔥",
            BadgeKind::MonthMaster => "👑",
            BadgeKind::CenturyChampion => "💎",
            BadgeKind::RisingStar => "⭐",
            BadgeKind::BlogVeteran => "🎖️",
        }
    }

    pub fn metric(&self) -> BadgeMetric {
        match self {
            BadgeKind::WeekWarrior | BadgeKind::MonthMaster | BadgeKind::CenturyChampion => {
                BadgeMetric::CurrentStreak
            }
            BadgeKind::RisingStar | BadgeKind::BlogVeteran => BadgeMetric::Level,
        }
    }

    pub fn threshold(&self) -> u32 {
        match self {
            BadgeKind::WeekWarrior => 7,
            BadgeKind::MonthMaster => 30,
            BadgeKind::CenturyChampion => 100,
            BadgeKind::RisingStar => 5,
            BadgeKind::BlogVeteran => 10,
        }
    }

    pub fn is_earned(&self, current_streak: u32, level: u32) -> bool {
        let value = match self.metric() {
            BadgeMetric::CurrentStreak => current_streak,
            BadgeMetric::Level => level,
        };
        value >= self.threshold()
    }

    pub fn unlock(&self, unlocked_at: DateTime<Utc>) -> Badge {
        Badge::restore(
            self.name().to_string(),
            self.description().to_string(),
            self.icon().to_string(),
            unlocked_at,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    pub total_blogs: u64,
    pub total_words: u64,
    pub streak_freezes_used: u32,
    pub max_streak_freezes_allowed: u32,
}

impl StreakStats {
    pub const DEFAULT_MAX_STREAK_FREEZES: u32 = 3;

    pub fn with_freeze_allowance(max_streak_freezes_allowed: u32) -> Self {
        Self {
            total_blogs: 0,
            total_words: 0,
            streak_freezes_used: 0,
            max_streak_freezes_allowed,
        }
    }

    pub fn freezes_remaining(&self) -> u32 {
        self.max_streak_freezes_allowed
            .saturating_sub(self.streak_freezes_used)
    }
}

impl Default for StreakStats {
    fn default() -> Self {
        Self::with_freeze_allowance(Self::DEFAULT_MAX_STREAK_FREEZES)
    }
}

/// Heat-map intensity of a calendar day (0..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityLevel(u8);

impl ActivityLevel {
    pub fn from_blogs_posted(blogs_posted: u32) -> Self {
        let level = match blogs_posted {
            0 => 0,
            1 => 1,
            2 => 2,
            3..=4 => 3,
            _ => 4,
        };
        Self(level)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Motivational tier derived from the current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakStatus {
    Newbie,
    GettingStarted,
    Consistent,
    Dedicated,
    Legendary,
}

impl StreakStatus {
    pub fn from_streak(current_streak: u32) -> Self {
        match current_streak {
            0 => StreakStatus::Newbie,
            1..=6 => StreakStatus::GettingStarted,
            7..=29 => StreakStatus::Consistent,
            30..=99 => StreakStatus::Dedicated,
            _ => StreakStatus::Legendary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreakStatus::Newbie => "newbie",
            StreakStatus::GettingStarted => "getting-started",
            StreakStatus::Consistent => "consistent",
            StreakStatus::Dedicated => "dedicated",
            StreakStatus::Legendary => "legendary",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StreakStatus::Newbie => "Start your blogging journey!",
            StreakStatus::GettingStarted => "Building momentum!",
            StreakStatus::Consistent => "Great consistency!",
            StreakStatus::Dedicated => "Truly dedicated blogger!",
            StreakStatus::Legendary => "Legendary blogger!",
        }
    }
}

/// Count whitespace-separated words in post content
pub fn count_words(content: &str) -> u64 {
    content.split_whitespace().count() as u64
}
