use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::application::commands::handlers::*;
use crate::application::event_handlers::MilestoneLogEventHandler;
use crate::application::queries::StreakQueries;
use crate::application::services::{Clock, SystemClock, UserLockRegistry};
use crate::presentation::state::{AppState, CommandHandlers, Queries};
use inkstreak_domain::events::streak_events::{BadgeUnlocked, LeveledUp, StreakFreezeUsed};
use inkstreak_domain::events::{typed, EventBus};
use inkstreak_domain::shared::DomainError;
use inkstreak_domain::streak::UserStreakRepository;
use inkstreak_infrastructure::config::AppConfig;
use inkstreak_infrastructure::events::InMemoryEventBus;
use inkstreak_infrastructure::persistence::repositories::SqliteUserStreakRepository;
use inkstreak_infrastructure::persistence::Database;

pub async fn build_app_state(config: AppConfig) -> Result<AppState, DomainError> {
    build_app_state_with_clock(config, Arc::new(SystemClock)).await
}

pub async fn build_app_state_with_clock(
    config: AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<AppState, DomainError> {
    let startup_started_at = Instant::now();

    info!("Database path: {}", config.database_path.display());

    let started_at = Instant::now();
    let database = Database::from_config(&config).await?;
    info!(
        "Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    let started_at = Instant::now();
    database.run_migrations().await?;
    info!("Migrations completed ({}ms)", started_at.elapsed().as_millis());

    let pool = Arc::new(database.pool().clone());
    let streak_repo =
        Arc::new(SqliteUserStreakRepository::new(pool)) as Arc<dyn UserStreakRepository>;

    let event_bus = Arc::new(InMemoryEventBus::new());
    let milestones = MilestoneLogEventHandler;
    event_bus
        .subscribe::<BadgeUnlocked>(typed::<BadgeUnlocked, _>(milestones.clone()))
        .await;
    event_bus
        .subscribe::<LeveledUp>(typed::<LeveledUp, _>(milestones.clone()))
        .await;
    event_bus
        .subscribe::<StreakFreezeUsed>(typed::<StreakFreezeUsed, _>(milestones))
        .await;
    let event_bus = event_bus as Arc<dyn EventBus>;

    let locks = Arc::new(UserLockRegistry::new());

    let command_handlers = CommandHandlers {
        register_user: Arc::new(RegisterUserCommandHandler::new(
            streak_repo.clone(),
            event_bus.clone(),
            locks.clone(),
            clock.clone(),
            config.default_max_streak_freezes,
        )),
        record_post: Arc::new(RecordPostCommandHandler::new(
            streak_repo.clone(),
            event_bus.clone(),
            locks.clone(),
            clock.clone(),
        )),
        use_streak_freeze: Arc::new(UseStreakFreezeCommandHandler::new(
            streak_repo.clone(),
            event_bus,
            locks,
            clock.clone(),
        )),
    };

    let queries = Queries {
        streak: Arc::new(StreakQueries::new(streak_repo, clock)),
    };

    info!(
        "Application state ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        db: Arc::new(database),
        command_handlers,
        queries,
    })
}
