use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MAX_DAY_HOURS: f64 = 10.0;
pub const MAX_OVERTIME_HOURS: f64 = 4.0;
pub const HOURS_PER_DAY: f64 = 8.0;

/// A calendar month.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// `None` unless every day of the month and the first day of the
    /// following month are representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_months(Months::new(1))?;
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Empty for a period that does not name a real month.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let period = *self;
        self.first_day()
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(move |d| period.contains(*d))
    }

    /// Storage key suffix, e.g. `2025_01`.
    pub fn key(&self) -> String {
        format!("{:04}_{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DayEntry {
    pub hours: f64,
    #[serde(default)]
    pub overtime: f64,
}

impl DayEntry {
    pub fn new(hours: f64, overtime: f64) -> Self {
        Self { hours, overtime }
    }

    pub fn is_filled(&self) -> bool {
        self.hours > 0.0
    }
}

impl Default for DayEntry {
    fn default() -> Self {
        Self::new(HOURS_PER_DAY, 0.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimesheetStatus::Draft => "draft",
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Timesheet {
    pub period: Period,
    #[serde(default)]
    pub status: TimesheetStatus,
    #[serde(default)]
    pub entries: BTreeMap<NaiveDate, DayEntry>,
    #[serde(default)]
    pub remarks: String,
}

impl Timesheet {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            status: TimesheetStatus::Draft,
            entries: BTreeMap::new(),
            remarks: String::new(),
        }
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.entries.get(&date)
    }

    pub fn is_editable(&self) -> bool {
        self.status == TimesheetStatus::Draft
    }
}

/// Derived figures for one timesheet. Recomputed on demand, never stored.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct TimesheetStats {
    pub working_days: u32,
    pub filled_days: u32,
    pub total_hours: f64,
    pub overtime_hours: f64,
    pub expected_hours: f64,
    pub progress: u32,
}

impl TimesheetStats {
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}
