use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::calendar::working_days_between;
use crate::error::LeaveError;
use crate::model::holiday::HolidayCalendar;
use crate::model::leave::{LeaveKind, LeaveLedger, LeaveRequest, LeaveStatus};

/// Files a new pending request. Returns the updated ledger and the request id.
pub fn request_leave(
    ledger: &LeaveLedger,
    kind: LeaveKind,
    start: NaiveDate,
    end: NaiveDate,
    reason: &str,
    calendar: &HolidayCalendar,
) -> Result<(LeaveLedger, Uuid), LeaveError> {
    if start > end {
        return Err(LeaveError::InvalidLeave(format!("{} is after {}", start, end)));
    }
    let days = working_days_between(start, end, calendar);
    if days == 0 {
        return Err(LeaveError::InvalidLeave(format!(
            "no working day between {} and {}",
            start, end
        )));
    }
    if kind == LeaveKind::Annual {
        let remaining = ledger.balance().remaining;
        if days as f64 > remaining {
            return Err(LeaveError::InsufficientBalance {
                requested: days as f64,
                remaining,
            });
        }
    }

    let request = LeaveRequest {
        id: Uuid::new_v4(),
        kind,
        start,
        end,
        days,
        status: LeaveStatus::Pending,
        reason: reason.trim().to_string(),
    };
    let id = request.id;
    info!(%id, kind = kind.id(), days, "Leave requested");

    let mut next = ledger.clone();
    next.requests.push(request);
    Ok((next, id))
}

pub fn cancel_leave(ledger: &LeaveLedger, id: Uuid) -> Result<LeaveLedger, LeaveError> {
    transition(ledger, id, LeaveStatus::Cancelled)
}

pub fn approve_leave(ledger: &LeaveLedger, id: Uuid) -> Result<LeaveLedger, LeaveError> {
    transition(ledger, id, LeaveStatus::Approved)
}

pub fn reject_leave(ledger: &LeaveLedger, id: Uuid) -> Result<LeaveLedger, LeaveError> {
    transition(ledger, id, LeaveStatus::Rejected)
}

/// Only pending requests move.
fn transition(ledger: &LeaveLedger, id: Uuid, to: LeaveStatus) -> Result<LeaveLedger, LeaveError> {
    let mut next = ledger.clone();
    let request = next
        .requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(LeaveError::LeaveNotFound(id))?;
    if request.status != LeaveStatus::Pending {
        return Err(LeaveError::InvalidState { actual: request.status });
    }
    request.status = to;
    info!(%id, status = %to, "Leave request updated");
    Ok(next)
}
