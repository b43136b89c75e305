use std::collections::BTreeMap;

use chrono::Datelike;

use crate::calendar::is_working_day;
use crate::model::holiday::HolidayCalendar;
use crate::model::timesheet::Timesheet;
use crate::service::dto::WeekSummary;

pub struct HistoryUseCase<'a> {
    timesheet: &'a Timesheet,
    calendar: &'a HolidayCalendar,
}

impl<'a> HistoryUseCase<'a> {
    pub fn new(timesheet: &'a Timesheet, calendar: &'a HolidayCalendar) -> Self {
        Self { timesheet, calendar }
    }

    /// One row per ISO week touching the month, oldest first.
    /// Weeks are clipped to the month, so the first and last may be partial.
    pub fn get_weekly_history(&self) -> Vec<WeekSummary> {
        let mut weeks: BTreeMap<(i32, u32), WeekSummary> = BTreeMap::new();

        for day in self.timesheet.period.days() {
            let iso = day.iso_week();
            let summary = weeks.entry((iso.year(), iso.week())).or_insert_with(|| WeekSummary {
                year: iso.year(),
                week: iso.week(),
                first_day: day,
                last_day: day,
                working_days: 0,
                filled_days: 0,
                hours: 0.0,
                overtime: 0.0,
            });
            summary.last_day = day;

            if !is_working_day(day, self.calendar) {
                continue;
            }
            summary.working_days += 1;
            if let Some(entry) = self.timesheet.entry(day).filter(|e| e.is_filled()) {
                summary.filled_days += 1;
                summary.hours += entry.hours;
                summary.overtime += entry.overtime;
            }
        }

        weeks.into_values().collect()
    }
}
