use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::streak_commands::*;
use crate::application::dtos::PostRecordedDto;
use crate::application::services::{Clock, UserLockRegistry};
use crate::application::ResultExt;
use inkstreak_domain::events::streak_events::{BadgeUnlocked, LeveledUp, PostRecorded};
use inkstreak_domain::events::{DomainEvent, EventBus};
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{count_words, day, StreakEngine, UserStreakRepository};

/// Record post command handler
pub struct RecordPostCommandHandler {
    streak_repo: Arc<dyn UserStreakRepository>,
    event_bus: Arc<dyn EventBus>,
    locks: Arc<UserLockRegistry>,
    clock: Arc<dyn Clock>,
}

impl RecordPostCommandHandler {
    pub fn new(
        streak_repo: Arc<dyn UserStreakRepository>,
        event_bus: Arc<dyn EventBus>,
        locks: Arc<UserLockRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            streak_repo,
            event_bus,
            locks,
            clock,
        }
    }

    fn resolve_word_count(cmd: &RecordPostCommand) -> Result<u64, DomainError> {
        let count = match (cmd.word_count, cmd.content.as_deref()) {
            (Some(count), _) if count < 0 => {
                return Err(DomainError::InvalidInput(format!(
                    "word_count must not be negative: {}",
                    count
                )));
            }
            (Some(count), _) => count.unsigned_abs(),
            (None, Some(content)) => count_words(content),
            (None, None) => 0,
        };
        if count > StreakEngine::MAX_WORDS_PER_POST {
            return Err(DomainError::InvalidInput(format!(
                "word_count must be at most {}: {}",
                StreakEngine::MAX_WORDS_PER_POST,
                count
            )));
        }
        Ok(count)
    }

    fn resolve_posted_at(&self, cmd: &RecordPostCommand) -> Result<DateTime<Utc>, DomainError> {
        match cmd.posted_at.as_deref() {
            Some(raw) => Ok(DateTime::parse_from_rfc3339(raw.trim())
                .to_invalid_input("posted_at must be an RFC 3339 timestamp")?
                .with_timezone(&Utc)),
            None => Ok(self.clock.now()),
        }
    }
}

#[async_trait]
impl CommandHandler<RecordPostCommand> for RecordPostCommandHandler {
    type Result = PostRecordedDto;

    async fn handle(&self, cmd: RecordPostCommand) -> Result<Self::Result, DomainError> {
        if cmd.user_id.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "user_id must not be empty".to_string(),
            ));
        }
        let user_id = UserId::from_string(cmd.user_id.trim());
        let word_count = Self::resolve_word_count(&cmd)?;
        let posted_at = self.resolve_posted_at(&cmd)?;

        info!(
            "Handling RecordPostCommand for user: {} ({} words)",
            user_id, word_count
        );

        let (saved, outcome, previous_level) = {
            let _guard = self.locks.lock(&user_id).await;
            let record = self
                .streak_repo
                .find_by_user_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;

            let (next, outcome) = StreakEngine::record_post(&record, posted_at, word_count);
            let saved = self.streak_repo.save(&next).await?;
            (saved, outcome, record.level())
        };

        let mut events: Vec<Box<dyn DomainEvent>> = vec![Box::new(PostRecorded {
            user_id: user_id.clone(),
            post_date: day::calendar_day(posted_at),
            word_count,
            current_streak: outcome.current_streak,
            experience_gained: outcome.experience_gained,
            occurred_at: posted_at,
        })];
        if outcome.levels_gained > 0 {
            events.push(Box::new(LeveledUp {
                user_id: user_id.clone(),
                previous_level,
                new_level: outcome.level,
                occurred_at: posted_at,
            }));
        }
        for badge in &outcome.new_badges {
            events.push(Box::new(BadgeUnlocked {
                user_id: user_id.clone(),
                badge_name: badge.name().to_string(),
                occurred_at: badge.unlocked_at(),
            }));
        }
        for event in events {
            self.event_bus.publish(event).await?;
        }

        Ok(PostRecordedDto::from_outcome(&saved, &outcome))
    }
}
