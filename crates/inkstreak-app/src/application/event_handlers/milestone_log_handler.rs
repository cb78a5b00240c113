use async_trait::async_trait;
use tracing::info;

use inkstreak_domain::events::streak_events::{BadgeUnlocked, LeveledUp, StreakFreezeUsed};
use inkstreak_domain::events::EventHandler;
use inkstreak_domain::shared::DomainError;

/// Writes progression milestones to the structured log
#[derive(Clone, Default)]
pub struct MilestoneLogEventHandler;

#[async_trait]
impl EventHandler<BadgeUnlocked> for MilestoneLogEventHandler {
    async fn handle(&self, event: &BadgeUnlocked) -> Result<(), DomainError> {
        info!(
            target: "inkstreak::milestones",
            user_id = %event.user_id,
            badge = %event.badge_name,
            "Badge unlocked"
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler<LeveledUp> for MilestoneLogEventHandler {
    async fn handle(&self, event: &LeveledUp) -> Result<(), DomainError> {
        info!(
            target: "inkstreak::milestones",
            user_id = %event.user_id,
            previous_level = event.previous_level,
            new_level = event.new_level,
            "Level up"
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler<StreakFreezeUsed> for MilestoneLogEventHandler {
    async fn handle(&self, event: &StreakFreezeUsed) -> Result<(), DomainError> {
        info!(
            target: "inkstreak::milestones",
            user_id = %event.user_id,
            freezes_remaining = event.freezes_remaining,
            current_streak = event.current_streak,
            "Streak freeze used"
        );
        Ok(())
    }
}
