use serde::Serialize;
use chrono::NaiveDate;

use crate::model::gamification::{Level, BADGES};
use crate::model::leave::LeaveBalance;
use crate::model::timesheet::{TimesheetStats, TimesheetStatus};
use crate::model::user::Role;
use crate::repository::KeyValueStore;
use crate::service::gamification_service::{xp_progress, xp_to_next_level};
use crate::usecase::session::Session;

/// Everything the dashboard shows, flattened for display.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardDto {
    pub user_name: Option<String>,
    pub role: Option<Role>,
    pub period: String,
    pub status: TimesheetStatus,
    pub stats: TimesheetStats,

    pub xp: u32,
    pub level: Level,
    pub xp_progress: u32,
    pub xp_to_next: u32,
    pub streak: u32,
    pub badges_unlocked: usize,
    pub badges_total: usize,

    pub leave: LeaveBalance,
}

impl DashboardDto {
    pub fn from_session<S: KeyValueStore>(session: &Session<S>) -> Self {
        let gamification = session.gamification();
        let user = session.user();
        Self {
            user_name: user.map(|u| u.full_name.clone()),
            role: user.map(|u| u.role),
            period: session.timesheet().period.to_string(),
            status: session.timesheet().status,
            stats: session.stats(),
            xp: gamification.xp,
            level: session.level(),
            xp_progress: xp_progress(gamification.xp),
            xp_to_next: xp_to_next_level(gamification.xp),
            streak: gamification.streak,
            badges_unlocked: BADGES.iter().filter(|b| gamification.has_badge(b.id)).count(),
            badges_total: BADGES.len(),
            leave: session.leave().balance(),
        }
    }
}

/// Hours summed over one ISO week of a timesheet.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub year: i32,
    pub week: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub working_days: u32,
    pub filled_days: u32,
    pub hours: f64,
    pub overtime: f64,
}

impl WeekSummary {
    pub fn label(&self) -> String {
        format!("S{:02}", self.week)
    }
}
