use chrono::{Datelike, Duration, NaiveDate, TimeDelta, Weekday};
use anyhow::{anyhow, Result};

use crate::model::timesheet::Period;

/// Resolves a day typed by the user against the active period.
///
/// Accepts `today`, `yesterday`, `-N` (N days back), a weekday name
/// (most recent one, today included), a bare day of month (`14`) and
/// ISO dates (`2025-01-14`).
pub fn parse_day(input: &str, period: Period, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yes" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (-N)
    if let Some(rest) = input.strip_prefix('-') {
        let invalid = || anyhow!("Invalid relative format: {}", input);
        let count: i64 = rest.parse().map_err(|_| invalid())?;
        return TimeDelta::try_days(count)
            .and_then(|back| today.checked_sub_signed(back))
            .ok_or_else(invalid);
    }

    // 3. Weekday name
    if let Ok(target) = parse_weekday_str(input) {
        let mut back = today.weekday().num_days_from_monday() as i64
            - target.num_days_from_monday() as i64;
        if back < 0 {
            back += 7;
        }
        return Ok(today - Duration::days(back));
    }

    // 4. Day of month in the active period
    if let Ok(day) = input.parse::<u32>() {
        return NaiveDate::from_ymd_opt(period.year, period.month, day)
            .ok_or_else(|| anyhow!("{} has no day {}", period, day));
    }

    // 5. Fallback to ISO format
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| anyhow!("Could not parse date: {}", input))
}

/// Parses `YYYY-MM`, `current`, `next` or `prev` relative to `today`.
pub fn parse_period(input: &str, today: NaiveDate) -> Result<Period> {
    let current = Period::of(today);
    match input.trim().to_lowercase().as_str() {
        "current" | "cur" | "" => return Ok(current),
        "next" => return Ok(current.next()),
        "prev" | "previous" | "last" => return Ok(current.previous()),
        _ => {}
    }

    let (year, month) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", input))?;
    let year: i32 = year.parse().map_err(|_| anyhow!("Invalid year: {}", year))?;
    let month: u32 = month.parse().map_err(|_| anyhow!("Invalid month: {}", month))?;
    Period::new(year, month).ok_or_else(|| anyhow!("Invalid period: {}", input))
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" | "lun" | "lundi" => Ok(Weekday::Mon),
        "tue" | "tuesday" | "mar" | "mardi" => Ok(Weekday::Tue),
        "wed" | "wednesday" | "mer" | "mercredi" => Ok(Weekday::Wed),
        "thu" | "thursday" | "jeu" | "jeudi" => Ok(Weekday::Thu),
        "fri" | "friday" | "ven" | "vendredi" => Ok(Weekday::Fri),
        "sat" | "saturday" | "sam" | "samedi" => Ok(Weekday::Sat),
        "sun" | "sunday" | "dim" | "dimanche" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
