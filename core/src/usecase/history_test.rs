#[cfg(test)]
mod tests {
    use crate::calendar::working_days;
    use crate::model::holiday::HolidayCalendar;
    use crate::model::timesheet::{DayEntry, Period, Timesheet};
    use crate::usecase::history::HistoryUseCase;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_history_january() {
        let lux = HolidayCalendar::luxembourg_2025();
        let mut ts = Timesheet::new(Period::new(2025, 1).unwrap());
        ts.entries.insert(date(2025, 1, 2), DayEntry::new(8.0, 1.0));
        ts.entries.insert(date(2025, 1, 3), DayEntry::new(6.0, 0.0));
        ts.entries.insert(date(2025, 1, 6), DayEntry::new(0.0, 2.0));

        let history = HistoryUseCase::new(&ts, &lux).get_weekly_history();
        let weeks: Vec<u32> = history.iter().map(|w| w.week).collect();
        assert_eq!(weeks, vec![1, 2, 3, 4, 5]);

        // Week 1 is clipped to Jan 1-5 and New Year's Day is not a working day.
        let first = &history[0];
        assert_eq!(first.first_day, date(2025, 1, 1));
        assert_eq!(first.last_day, date(2025, 1, 5));
        assert_eq!(first.working_days, 2);
        assert_eq!(first.filled_days, 2);
        assert_eq!(first.hours, 14.0);
        assert_eq!(first.overtime, 1.0);
        assert_eq!(first.label(), "S01");

        // Zero-hour entries are not filled and do not count overtime.
        assert_eq!(history[1].filled_days, 0);
        assert_eq!(history[1].overtime, 0.0);

        let total: u32 = history.iter().map(|w| w.working_days).sum();
        assert_eq!(total, working_days(ts.period, &lux).len() as u32);
    }

    #[test]
    fn test_weekly_history_crosses_iso_year() {
        let lux = HolidayCalendar::luxembourg_2025();
        let ts = Timesheet::new(Period::new(2025, 12).unwrap());

        let history = HistoryUseCase::new(&ts, &lux).get_weekly_history();
        let last = history.last().unwrap();
        assert_eq!((last.year, last.week), (2026, 1));
        assert_eq!(last.first_day, date(2025, 12, 29));
        assert_eq!(last.last_day, date(2025, 12, 31));
        assert_eq!(history[0].week, 49);
        assert!(history.iter().all(|w| w.hours == 0.0));
    }
}
