use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::holiday::{Holiday, HolidayCalendar};
use crate::model::timesheet::Period;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayKind<'a> {
    Working,
    Weekend,
    Holiday(&'a Holiday),
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_working_day(date: NaiveDate, calendar: &HolidayCalendar) -> bool {
    !is_weekend(date) && !calendar.contains(date)
}

/// Holidays win over weekends so that a holiday on a Saturday still shows its name.
pub fn classify(date: NaiveDate, calendar: &HolidayCalendar) -> DayKind<'_> {
    if let Some(holiday) = calendar.holiday_info(date) {
        DayKind::Holiday(holiday)
    } else if is_weekend(date) {
        DayKind::Weekend
    } else {
        DayKind::Working
    }
}

pub fn working_days(period: Period, calendar: &HolidayCalendar) -> Vec<NaiveDate> {
    period
        .days()
        .filter(|d| is_working_day(*d, calendar))
        .collect()
}

/// Inclusive count of working days between two dates. Zero when `start > end`.
pub fn working_days_between(start: NaiveDate, end: NaiveDate, calendar: &HolidayCalendar) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d, calendar))
        .count() as u32
}
