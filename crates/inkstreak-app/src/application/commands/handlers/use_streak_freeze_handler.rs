use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::streak_commands::*;
use crate::application::dtos::FreezeResultDto;
use crate::application::services::{Clock, UserLockRegistry};
use inkstreak_domain::events::streak_events::StreakFreezeUsed;
use inkstreak_domain::events::EventBus;
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{StreakEngine, UserStreakRepository};

/// Use streak freeze command handler
pub struct UseStreakFreezeCommandHandler {
    streak_repo: Arc<dyn UserStreakRepository>,
    event_bus: Arc<dyn EventBus>,
    locks: Arc<UserLockRegistry>,
    clock: Arc<dyn Clock>,
}

impl UseStreakFreezeCommandHandler {
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
}

#[async_trait]
impl CommandHandler<UseStreakFreezeCommand> for UseStreakFreezeCommandHandler {
    type Result = FreezeResultDto;

    async fn handle(&self, cmd: UseStreakFreezeCommand) -> Result<Self::Result, DomainError> {
        let user_id = UserId::from_string(cmd.user_id.trim());
        info!("Handling UseStreakFreezeCommand for user: {}", user_id);

        let now = self.clock.now();
        let (saved, outcome) = {
            let _guard = self.locks.lock(&user_id).await;
            let record = self
                .streak_repo
                .find_by_user_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;

            let (next, outcome) = StreakEngine::use_streak_freeze(&record, now).map_err(|e| {
                warn!("Streak freeze rejected for user {}: {}", user_id, e);
                e
            })?;
            let saved = self.streak_repo.save(&next).await?;
            (saved, outcome)
        };

        let event = StreakFreezeUsed {
            user_id: user_id.clone(),
            freezes_remaining: outcome.freezes_remaining,
            current_streak: outcome.current_streak,
            occurred_at: now,
        };
        self.event_bus.publish(Box::new(event)).await?;

        Ok(FreezeResultDto::from_outcome(&saved, &outcome))
    }
}
