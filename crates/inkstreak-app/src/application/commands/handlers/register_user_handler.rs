use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::streak_commands::*;
use crate::application::services::{Clock, UserLockRegistry};
use inkstreak_domain::events::streak_events::UserRegistered;
use inkstreak_domain::events::EventBus;
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{UserStreak, UserStreakRepository};

/// Register user command handler
pub struct RegisterUserCommandHandler {
    streak_repo: Arc<dyn UserStreakRepository>,
    event_bus: Arc<dyn EventBus>,
    locks: Arc<UserLockRegistry>,
    clock: Arc<dyn Clock>,
    default_max_streak_freezes: u32,
}

impl RegisterUserCommandHandler {
    pub fn new(
        streak_repo: Arc<dyn UserStreakRepository>,
        event_bus: Arc<dyn EventBus>,
        locks: Arc<UserLockRegistry>,
        clock: Arc<dyn Clock>,
        default_max_streak_freezes: u32,
    ) -> Self {
        Self {
            streak_repo,
            event_bus,
            locks,
            clock,
            default_max_streak_freezes,
        }
    }
}

#[async_trait]
impl CommandHandler<RegisterUserCommand> for RegisterUserCommandHandler {
    type Result = RegisterUserResult;

    async fn handle(&self, cmd: RegisterUserCommand) -> Result<Self::Result, DomainError> {
        let user_id = match cmd.user_id.as_deref().map(str::trim) {
            Some("") => {
                return Err(DomainError::InvalidInput(
                    "user_id must not be empty".to_string(),
                ))
            }
            Some(id) => UserId::from_string(id),
            None => UserId::new(),
        };
        let max_streak_freezes = cmd
            .max_streak_freezes
            .unwrap_or(self.default_max_streak_freezes);

        info!("Handling RegisterUserCommand for user: {}", user_id);

        let now = self.clock.now();
        let record = {
            let _guard = self.locks.lock(&user_id).await;
            if self.streak_repo.find_by_user_id(&user_id).await?.is_some() {
                return Err(DomainError::Validation(format!(
                    "User {} is already registered",
                    user_id
                )));
            }
            self.streak_repo
                .create(&UserStreak::new(user_id.clone(), max_streak_freezes, now))
                .await?
        };

        info!(
            "User registered: {} with {} streak freezes",
            record.user_id(),
            record.stats().max_streak_freezes_allowed
        );

        let event = UserRegistered {
            user_id: record.user_id().clone(),
            max_streak_freezes_allowed: record.stats().max_streak_freezes_allowed,
            occurred_at: now,
        };
        self.event_bus.publish(Box::new(event)).await?;

        Ok(RegisterUserResult {
            user_id: record.user_id().to_string(),
        })
    }
}
