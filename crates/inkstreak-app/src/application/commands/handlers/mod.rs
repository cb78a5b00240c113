mod record_post_handler;
mod register_user_handler;
mod use_streak_freeze_handler;


pub use record_post_handler::RecordPostCommandHandler;
pub use register_user_handler::RegisterUserCommandHandler;
pub use use_streak_freeze_handler::UseStreakFreezeCommandHandler;
