use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{PortalConfig, Rewards};
use crate::error::{LeaveError, TimesheetError};
use crate::model::gamification::{Event, GamificationState, Level, Outcome};
use crate::model::holiday::HolidayCalendar;
use crate::model::leave::{LeaveKind, LeaveLedger};
use crate::model::timesheet::{DayEntry, Period, Timesheet, TimesheetStats};
use crate::model::user::{demo_user_for, UserProfile};
use crate::repository::KeyValueStore;
use crate::service::{gamification_service, leave_service, timesheet_service};

pub const USER_KEY: &str = "user";
pub const GAMIFICATION_KEY: &str = "gamification";
pub const LEAVE_KEY: &str = "leave";

pub fn timesheet_key(period: Period) -> String {
    format!("timesheet_{}", period.key())
}

/// The single owner of a user's portal state.
///
/// Commands take `&mut self`, run to completion and checkpoint the state
/// they touched. Persistence is best-effort: failures are logged and the
/// in-memory state stays authoritative.
pub struct Session<S: KeyValueStore> {
    store: S,
    calendar: HolidayCalendar,
    rewards: Rewards,
    user: Option<UserProfile>,
    timesheet: Timesheet,
    gamification: GamificationState,
    leave: LeaveLedger,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(store: S, calendar: HolidayCalendar, config: &PortalConfig, period: Period) -> Self {
        let user = load_or(&store, USER_KEY, || None);
        let gamification = load_or(&store, GAMIFICATION_KEY, GamificationState::default);
        let timesheet = load_timesheet(&store, period);
        let mut leave = load_or(&store, LEAVE_KEY, || LeaveLedger::new(config.annual_leave_days));
        // The configured allowance always wins over the stored one.
        leave.annual_allowance = config.annual_leave_days;

        Self {
            store,
            calendar,
            rewards: config.rewards,
            user,
            timesheet,
            gamification,
            leave,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn timesheet(&self) -> &Timesheet {
        &self.timesheet
    }

    pub fn gamification(&self) -> &GamificationState {
        &self.gamification
    }

    pub fn leave(&self) -> &LeaveLedger {
        &self.leave
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> TimesheetStats {
        timesheet_service::compute_stats(&self.timesheet, &self.calendar)
    }

    pub fn level(&self) -> Level {
        gamification_service::level_of(self.gamification.xp)
    }

    // Identity

    pub fn login(&mut self, profile: UserProfile, today: NaiveDate) -> Vec<Event> {
        info!(user = %profile.email, "Login");
        self.user = Some(profile);
        self.persist(USER_KEY, &self.user);

        self.gamification = gamification_service::record_login(&self.gamification, today);
        let events = self.unlock_eligible();
        self.persist_gamification();
        events
    }

    pub fn logout(&mut self) {
        self.user = None;
        if let Err(e) = self.store.remove(USER_KEY) {
            warn!(error = %e, "Failed to clear stored user");
        }
    }

    /// Swaps to the demo account of the other role.
    pub fn switch_role(&mut self) -> Option<&UserProfile> {
        let role = self.user.as_ref()?.role.other();
        self.user = demo_user_for(role);
        self.persist(USER_KEY, &self.user);
        self.user.as_ref()
    }

    // Timesheet

    /// Loads (or starts) the timesheet of another month.
    pub fn switch_period(&mut self, period: Period) {
        if period != self.timesheet.period {
            self.timesheet = load_timesheet(&self.store, period);
        }
    }

    /// Every successful call earns the day reward, including re-edits of a filled day.
    pub fn record_entry(&mut self, date: NaiveDate, entry: DayEntry) -> Result<Vec<Event>, TimesheetError> {
        self.timesheet = timesheet_service::record_entry(&self.timesheet, date, entry, &self.calendar)?;
        self.persist_timesheet();
        let events = self.award_xp(self.rewards.day_filled, "Jour rempli");
        Ok(events)
    }

    pub fn clear_entry(&mut self, date: NaiveDate) -> Result<(), TimesheetError> {
        self.timesheet = timesheet_service::clear_entry(&self.timesheet, date)?;
        self.persist_timesheet();
        Ok(())
    }

    pub fn set_remarks(&mut self, text: &str) -> Result<(), TimesheetError> {
        self.timesheet = timesheet_service::set_remarks(&self.timesheet, text)?;
        self.persist_timesheet();
        Ok(())
    }

    pub fn save(&mut self) {
        self.timesheet = timesheet_service::save(&self.timesheet);
        self.persist_timesheet();
    }

    pub fn submit(&mut self) -> Result<Vec<Event>, TimesheetError> {
        self.timesheet = timesheet_service::submit(&self.timesheet, &self.calendar)?;
        self.persist_timesheet();

        self.gamification.submitted += 1;
        let mut events = self.award_xp(self.rewards.timesheet_submitted, "Timesheet soumis");
        events.extend(self.unlock_eligible());
        self.persist_gamification();
        Ok(events)
    }

    pub fn approve(&mut self) -> Result<(), TimesheetError> {
        self.timesheet = timesheet_service::approve(&self.timesheet)?;
        self.persist_timesheet();
        Ok(())
    }

    pub fn reject(&mut self) -> Result<(), TimesheetError> {
        self.timesheet = timesheet_service::reject(&self.timesheet)?;
        self.persist_timesheet();
        Ok(())
    }

    // Gamification

    pub fn award_xp(&mut self, amount: u32, reason: &str) -> Vec<Event> {
        let outcome = gamification_service::award_xp(&self.gamification, amount, reason);
        self.apply(outcome)
    }

    pub fn unlock_badge(&mut self, badge_id: &str) -> Vec<Event> {
        let outcome = gamification_service::unlock_badge(&self.gamification, badge_id);
        self.apply(outcome)
    }

    fn unlock_eligible(&mut self) -> Vec<Event> {
        let stats = self.stats();
        let eligible = gamification_service::check_eligible_badges(&self.gamification, &stats);
        eligible
            .iter()
            .flat_map(|id| self.unlock_badge(id))
            .collect()
    }

    fn apply(&mut self, outcome: Outcome<GamificationState>) -> Vec<Event> {
        self.gamification = outcome.state;
        self.persist_gamification();
        outcome.events
    }

    // Leave

    pub fn request_leave(
        &mut self,
        kind: LeaveKind,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
    ) -> Result<(Uuid, Vec<Event>), LeaveError> {
        let (ledger, id) = leave_service::request_leave(&self.leave, kind, start, end, reason, &self.calendar)?;
        self.leave = ledger;
        self.persist(LEAVE_KEY, &self.leave);
        let events = self.award_xp(self.rewards.leave_requested, "Demande de congé");
        Ok((id, events))
    }

    pub fn cancel_leave(&mut self, id: Uuid) -> Result<(), LeaveError> {
        self.leave = leave_service::cancel_leave(&self.leave, id)?;
        self.persist(LEAVE_KEY, &self.leave);
        Ok(())
    }

    pub fn approve_leave(&mut self, id: Uuid) -> Result<(), LeaveError> {
        self.leave = leave_service::approve_leave(&self.leave, id)?;
        self.persist(LEAVE_KEY, &self.leave);
        Ok(())
    }

    pub fn reject_leave(&mut self, id: Uuid) -> Result<(), LeaveError> {
        self.leave = leave_service::reject_leave(&self.leave, id)?;
        self.persist(LEAVE_KEY, &self.leave);
        Ok(())
    }

    // Persistence

    fn persist_timesheet(&self) {
        self.persist(&timesheet_key(self.timesheet.period), &self.timesheet);
    }

    fn persist_gamification(&self) {
        self.persist(GAMIFICATION_KEY, &self.gamification);
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(Into::into)
            .and_then(|json| self.store.save(key, &json));
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to persist state");
        }
    }
}

/// A stored sheet filed under the wrong month is ignored.
fn load_timesheet<S: KeyValueStore>(store: &S, period: Period) -> Timesheet {
    let key = timesheet_key(period);
    let loaded: Timesheet = load_or(store, &key, || Timesheet::new(period));
    if loaded.period != period {
        warn!(key = %key, stored = %loaded.period, "Stored timesheet belongs to another month, starting fresh");
        return Timesheet::new(period);
    }
    loaded
}

fn load_or<S, T, F>(store: &S, key: &str, default: F) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(key, error = %e, "Stored value is unreadable, using default");
                default()
            }
        },
        Ok(None) => default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to load state, using default");
            default()
        }
    }
}
