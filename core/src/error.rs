use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::model::leave::LeaveStatus;
use crate::model::timesheet::TimesheetStatus;

/// Rejections raised by the timesheet engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimesheetError {
    #[error("{date} is not a working day of {period}")]
    InvalidDay { date: NaiveDate, period: String },

    #[error("timesheet is {actual}, expected {expected}")]
    InvalidState {
        expected: TimesheetStatus,
        actual: TimesheetStatus,
    },

    #[error("timesheet is only {progress}% complete ({filled}/{working} days)")]
    IncompleteTimesheet {
        progress: u32,
        filled: u32,
        working: u32,
    },

    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LeaveError {
    #[error("invalid leave request: {0}")]
    InvalidLeave(String),

    #[error("not enough annual leave: {requested} day(s) requested, {remaining} remaining")]
    InsufficientBalance { requested: f64, remaining: f64 },

    #[error("leave request {0} not found")]
    LeaveNotFound(Uuid),

    #[error("leave request is {actual}, expected pending")]
    InvalidState { actual: LeaveStatus },
}

/// Persistence failures. The session logs and swallows these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
