use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ANNUAL_ALLOWANCE: f64 = 26.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveKind {
    Annual,
    Sick,
    Family,
    Remote,
    Training,
    Other,
}

impl LeaveKind {
    pub const ALL: [LeaveKind; 6] = [
        LeaveKind::Annual,
        LeaveKind::Sick,
        LeaveKind::Family,
        LeaveKind::Remote,
        LeaveKind::Training,
        LeaveKind::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            LeaveKind::Annual => "annual",
            LeaveKind::Sick => "sick",
            LeaveKind::Family => "family",
            LeaveKind::Remote => "remote",
            LeaveKind::Training => "training",
            LeaveKind::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveKind::Annual => "🏖️ Congé annuel",
            LeaveKind::Sick => "🤒 Maladie",
            LeaveKind::Family => "👨‍👩‍👧 Événement familial",
            LeaveKind::Remote => "🏠 Télétravail",
            LeaveKind::Training => "📚 Formation",
            LeaveKind::Other => "📋 Autre",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub kind: LeaveKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Working days covered by `start..=end`.
    pub days: u32,
    pub status: LeaveStatus,
    #[serde(default)]
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeaveLedger {
    pub annual_allowance: f64,
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
}

impl Default for LeaveLedger {
    fn default() -> Self {
        Self::new(DEFAULT_ANNUAL_ALLOWANCE)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct LeaveBalance {
    pub annual: f64,
    pub taken: f64,
    pub pending: f64,
    pub remaining: f64,
}

impl LeaveLedger {
    pub fn new(annual_allowance: f64) -> Self {
        Self {
            annual_allowance,
            requests: Vec::new(),
        }
    }

    pub fn find(&self, id: Uuid) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Annual-leave balance. Other kinds do not consume the allowance.
    pub fn balance(&self) -> LeaveBalance {
        let sum = |status: LeaveStatus| -> f64 {
            self.requests
                .iter()
                .filter(|r| r.kind == LeaveKind::Annual && r.status == status)
                .map(|r| r.days as f64)
                .sum()
        };
        let taken = sum(LeaveStatus::Approved);
        let pending = sum(LeaveStatus::Pending);
        LeaveBalance {
            annual: self.annual_allowance,
            taken,
            pending,
            remaining: (self.annual_allowance - taken - pending).max(0.0),
        }
    }
}
