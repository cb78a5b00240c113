mod aggregate;
mod calendar;
pub mod day;
mod engine;
mod repository;
mod summary;
mod value_objects;


pub use aggregate::UserStreak;
pub use calendar::{ActivityCalendarProjector, CalendarDay, CalendarView};
pub use engine::{FreezeOutcome, PostOutcome, StreakEngine};
pub use repository::UserStreakRepository;
pub use summary::StreakSummary;
pub use value_objects::{
    count_words, merge_by_date, ActivityLevel, Badge, BadgeKind, BadgeMetric, DailyActivity,
    StreakStats, StreakStatus,
};
