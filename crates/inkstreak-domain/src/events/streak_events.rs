use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::events::DomainEvent;
use crate::shared::UserId;

/// Macro to implement DomainEvent trait with type name
macro_rules! impl_domain_event {
    ($type:ty) => {
        impl DomainEvent for $type {
            fn as_any(&self) -> &(dyn Any + Send + Sync) {
                self
            }

            fn event_type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
        }
    };
}

/// Event fired when a streak record is created for a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: UserId,
    pub max_streak_freezes_allowed: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(UserRegistered);

/// Event fired after a post has been credited to the streak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecorded {
    pub user_id: UserId,
    pub post_date: NaiveDate,
    pub word_count: u64,
    pub current_streak: u32,
    pub experience_gained: u64,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(PostRecorded);

/// Event fired once per badge unlocked by a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeUnlocked {
    pub user_id: UserId,
    pub badge_name: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(BadgeUnlocked);

/// Event fired when a post pushes the user over one or more level thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeveledUp {
    pub user_id: UserId,
    pub previous_level: u32,
    pub new_level: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(LeveledUp);

/// Event fired when a streak freeze credit is consumed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakFreezeUsed {
    pub user_id: UserId,
    pub freezes_remaining: u32,
    pub current_streak: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(StreakFreezeUsed);
