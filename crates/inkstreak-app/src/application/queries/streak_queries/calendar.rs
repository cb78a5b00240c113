use chrono::NaiveDate;
use log::info;

use crate::application::dtos::CalendarDto;
use inkstreak_domain::streak::{ActivityCalendarProjector, UserStreak};

pub fn get_calendar(record: &UserStreak, reference_date: NaiveDate) -> CalendarDto {
    let view = ActivityCalendarProjector::project(record, reference_date);

    info!(
        "[streak] get_calendar user_id={} reference={} active_days={}",
        record.user_id(),
        reference_date,
        view.active_days
    );

    CalendarDto::from_view(record.user_id().as_str(), &view)
}
