pub mod user_streak_repo;

pub use user_streak_repo::SqliteUserStreakRepository;
