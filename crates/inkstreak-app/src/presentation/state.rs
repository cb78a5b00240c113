use std::sync::Arc;

use crate::application::commands::handlers::*;
use crate::application::queries::StreakQueries;
use inkstreak_infrastructure::persistence::Database;

/// Command handlers container
pub struct CommandHandlers {
    pub register_user: Arc<RegisterUserCommandHandler>,
    pub record_post: Arc<RecordPostCommandHandler>,
    pub use_streak_freeze: Arc<UseStreakFreezeCommandHandler>,
}

pub struct Queries {
    pub streak: Arc<StreakQueries>,
}

pub struct AppState {
    pub db: Arc<Database>,
    pub command_handlers: CommandHandlers,
    pub queries: Queries,
}
