//! Calendar-day arithmetic.
//!
//! Every day boundary in the streak model is a UTC midnight. Post
//! timestamps, activity keys and calendar windows all go through these
//! helpers so they can never disagree.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Days of activity retained on the record, and the calendar length
pub const ACTIVITY_WINDOW_DAYS: i64 = 365;

/// UTC calendar day of a timestamp
pub fn calendar_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Oldest date kept in the rolling activity window ending at `today`
pub fn retention_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ACTIVITY_WINDOW_DAYS)
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_calendar_day_uses_utc() {
        let late = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        assert_eq!(calendar_day(late), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(calendar_day(early), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-03-13 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert_eq!(week_start(wednesday), sunday);
        assert_eq!(week_start(sunday), sunday);
    }

    #[test]
    fn test_retention_cutoff() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            retention_cutoff(today),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
