use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregate::UserStreak;
use super::day::ACTIVITY_WINDOW_DAYS;
use super::value_objects::{merge_by_date, ActivityLevel, DailyActivity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub blogs_posted: u32,
    pub streak_day: u32,
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub days: Vec<CalendarDay>,
    pub total_days: u32,
    pub active_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Read-only 365-day heat map over a user's activity log
pub struct ActivityCalendarProjector;

impl ActivityCalendarProjector {
    /// Project the window `[reference_date - 364, reference_date]`.
    pub fn project(record: &UserStreak, reference_date: NaiveDate) -> CalendarView {
        Self::project_activity(
            record.daily_activity().iter().cloned(),
            reference_date,
            record.current_streak(),
            record.longest_streak(),
        )
    }

    /// Same as [`project`](Self::project) for an arbitrary, possibly
    /// duplicated, activity source.
    pub fn project_activity<I>(
        activity: I,
        reference_date: NaiveDate,
        current_streak: u32,
        longest_streak: u32,
    ) -> CalendarView
    where
        I: IntoIterator<Item = DailyActivity>,
    {
        let by_date: HashMap<NaiveDate, DailyActivity> = merge_by_date(activity)
            .into_iter()
            .map(|entry| (entry.date, entry))
            .collect();

        let first_day = reference_date - Duration::days(ACTIVITY_WINDOW_DAYS - 1);
        let days: Vec<CalendarDay> = first_day
            .iter_days()
            .take(ACTIVITY_WINDOW_DAYS as usize)
            .map(|date| {
                let entry = by_date
                    .get(&date)
                    .cloned()
                    .unwrap_or_else(|| DailyActivity::empty(date));
                CalendarDay {
                    date,
                    blogs_posted: entry.blogs_posted,
                    streak_day: entry.streak_day,
                    activity_level: ActivityLevel::from_blogs_posted(entry.blogs_posted),
                }
            })
            .collect();

        let active_days = days.iter().filter(|d| d.blogs_posted > 0).count() as u32;

        CalendarView {
            total_days: days.len() as u32,
            active_days,
            days,
            current_streak,
            longest_streak,
        }
    }
}
