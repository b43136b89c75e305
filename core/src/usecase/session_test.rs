
#[cfg(test)]
mod tests {
    use crate::calendar::working_days;
    use crate::config::PortalConfig;
    use crate::error::{StoreError, StoreResult, TimesheetError};
    use crate::model::gamification::{Event, GamificationState, FIRST_LOGIN, FIRST_TIMESHEET, ZERO_OVERTIME};
    use crate::model::holiday::HolidayCalendar;
    use crate::model::leave::{LeaveKind, LeaveStatus};
    use crate::model::timesheet::{DayEntry, Period, TimesheetStatus};
    use crate::model::user::{find_demo_user, Role};
    use crate::repository::{KeyValueStore, MemoryStore};
    use crate::usecase::session::{timesheet_key, Session, GAMIFICATION_KEY, LEAVE_KEY, USER_KEY};
    use chrono::{Duration, NaiveDate};
    use serde_json::{json, Value};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn load(&self, _key: &str) -> StoreResult<Option<Value>> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
        fn save(&self, _key: &str, _value: &Value) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> Period {
        Period::new(2025, 1).unwrap()
    }

    fn open<S: KeyValueStore>(store: S) -> Session<S> {
        Session::open(store, HolidayCalendar::luxembourg_2025(), &PortalConfig::default(), january())
    }

    fn fill_month<S: KeyValueStore>(session: &mut Session<S>, entry: DayEntry) {
        let days = working_days(session.timesheet().period, session.calendar());
        for day in days {
            session.record_entry(day, entry).unwrap();
        }
    }

    #[test]
    fn test_entry_awards_xp_on_every_edit() {
        let mut session = open(MemoryStore::new());
        let day = date(2025, 1, 2);

        session.record_entry(day, DayEntry::new(8.0, 0.0)).unwrap();
        session.record_entry(day, DayEntry::new(7.0, 1.0)).unwrap();
        assert_eq!(session.gamification().xp, 20);
        assert_eq!(session.timesheet().entries.len(), 1);
    }

    #[test]
    fn test_rejected_entry_awards_nothing() {
        let mut session = open(MemoryStore::new());
        let err = session.record_entry(date(2025, 1, 4), DayEntry::default()).unwrap_err();
        assert!(matches!(err, TimesheetError::InvalidDay { .. }));
        assert_eq!(session.gamification().xp, 0);
        assert!(session.timesheet().entries.is_empty());
    }

    #[test]
    fn test_full_month_submission() {
        let store = MemoryStore::new();
        let mut session = open(store);
        fill_month(&mut session, DayEntry::new(8.0, 1.0));
        assert_eq!(session.gamification().xp, 220);

        let events = session.submit().unwrap();
        assert_eq!(session.timesheet().status, TimesheetStatus::Submitted);
        assert_eq!(session.gamification().submitted, 1);
        // 220 + 50 submit + 100 first-timesheet + 50 first-login
        assert_eq!(session.gamification().xp, 420);
        assert!(session.gamification().has_badge(FIRST_TIMESHEET));
        assert!(!session.gamification().has_badge(ZERO_OVERTIME));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BadgeUnlocked { badge } if badge.id == FIRST_TIMESHEET)));

        // Second submit is rejected and grants nothing.
        assert!(matches!(session.submit(), Err(TimesheetError::InvalidState { .. })));
        assert_eq!(session.gamification().xp, 420);
        assert_eq!(session.gamification().submitted, 1);
    }

    #[test]
    fn test_submission_can_level_up() {
        let store = MemoryStore::new();
        store
            .save(
                GAMIFICATION_KEY,
                &json!({"xp": 100, "streak": 0, "unlocked_badges": [FIRST_LOGIN], "last_login_date": null}),
            )
            .unwrap();
        let mut session = open(store);
        fill_month(&mut session, DayEntry::new(8.0, 0.0));
        assert_eq!(session.gamification().xp, 320);

        let events = session.submit().unwrap();
        // 320 + 50 + 100 first-timesheet + 150 zero-overtime
        assert_eq!(session.gamification().xp, 620);
        assert!(session.gamification().has_badge(ZERO_OVERTIME));
        assert!(events.iter().any(|e| matches!(e, Event::LevelUp { to, .. } if to.rank == 2)));
    }

    #[test]
    fn test_incomplete_submit_keeps_draft() {
        let mut session = open(MemoryStore::new());
        session.record_entry(date(2025, 1, 2), DayEntry::default()).unwrap();
        let err = session.submit().unwrap_err();
        assert!(matches!(err, TimesheetError::IncompleteTimesheet { progress: 5, .. }));
        assert_eq!(session.timesheet().status, TimesheetStatus::Draft);
        assert_eq!(session.gamification().submitted, 0);
    }

    #[test]
    fn test_state_survives_reopen() {
        let store = MemoryStore::new();
        let mut session = open(store);
        let paul = find_demo_user("paul@lux-as.com").unwrap();
        session.login(paul.clone(), date(2025, 1, 6));
        session.record_entry(date(2025, 1, 6), DayEntry::new(8.0, 2.0)).unwrap();
        session.set_remarks("Client sur site").unwrap();

        let store = session.store();
        assert!(store.load(USER_KEY).unwrap().is_some());
        assert!(store.load(&timesheet_key(january())).unwrap().is_some());

        let copy = MemoryStore::new();
        for key in session.store().keys() {
            copy.save(&key, &session.store().load(&key).unwrap().unwrap()).unwrap();
        }
        let reopened = open(copy);
        assert_eq!(reopened.user(), Some(&paul));
        assert_eq!(reopened.timesheet(), session.timesheet());
        assert_eq!(reopened.gamification(), session.gamification());
        assert_eq!(reopened.timesheet().remarks, "Client sur site");
    }

    #[test]
    fn test_login_streak_and_first_login_badge() {
        let mut session = open(MemoryStore::new());
        let paul = find_demo_user("paul@lux-as.com").unwrap();
        let monday = date(2025, 1, 6);

        let events = session.login(paul.clone(), monday);
        assert_eq!(session.gamification().streak, 1);
        assert!(session.gamification().has_badge(FIRST_LOGIN));
        assert_eq!(session.gamification().xp, 50);
        assert_eq!(events.len(), 1);

        assert!(session.login(paul.clone(), monday).is_empty());
        assert_eq!(session.gamification().streak, 1);

        for offset in 1..7 {
            session.login(paul.clone(), monday + Duration::days(offset));
        }
        assert_eq!(session.gamification().streak, 7);
        assert!(session.gamification().has_badge("streak-7"));
        assert_eq!(session.gamification().xp, 200);
    }

    #[test]
    fn test_switch_role_and_logout() {
        let mut session = open(MemoryStore::new());
        assert!(session.switch_role().is_none());

        session.login(find_demo_user("paul@lux-as.com").unwrap(), date(2025, 1, 6));
        assert_eq!(session.switch_role().unwrap().role, Role::Manager);
        assert_eq!(session.switch_role().unwrap().email, "paul@lux-as.com");

        session.logout();
        assert!(session.user().is_none());
        assert!(session.store().load(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn test_manager_review() {
        let mut session = open(MemoryStore::new());
        assert!(session.approve().is_err());
        fill_month(&mut session, DayEntry::default());
        session.submit().unwrap();
        let xp = session.gamification().xp;

        session.approve().unwrap();
        assert_eq!(session.timesheet().status, TimesheetStatus::Approved);
        assert_eq!(session.gamification().xp, xp);
        assert!(session.reject().is_err());
    }

    #[test]
    fn test_switch_period_loads_separate_timesheet() {
        let mut session = open(MemoryStore::new());
        session.record_entry(date(2025, 1, 2), DayEntry::default()).unwrap();

        session.switch_period(Period::new(2025, 2).unwrap());
        assert!(session.timesheet().entries.is_empty());
        assert!(matches!(
            session.record_entry(date(2025, 1, 3), DayEntry::default()),
            Err(TimesheetError::InvalidDay { .. })
        ));

        session.switch_period(january());
        assert_eq!(session.timesheet().entries.len(), 1);
    }

    #[test]
    fn test_leave_requests_award_xp() {
        let mut session = open(MemoryStore::new());
        let (id, _) = session
            .request_leave(LeaveKind::Annual, date(2025, 2, 10), date(2025, 2, 14), "Vacances ski")
            .unwrap();
        assert_eq!(session.gamification().xp, 20);
        assert_eq!(session.leave().balance().remaining, 21.0);

        session.approve_leave(id).unwrap();
        assert_eq!(session.leave().find(id).unwrap().status, LeaveStatus::Approved);
        assert!(session.cancel_leave(id).is_err());

        assert!(session
            .request_leave(LeaveKind::Annual, date(2025, 2, 16), date(2025, 2, 15), "")
            .is_err());
        assert_eq!(session.gamification().xp, 20);
    }

    #[test]
    fn test_persistence_failures_are_swallowed() {
        let mut session = open(FailingStore);
        assert_eq!(session.gamification(), &GamificationState::default());
        assert!(session.user().is_none());

        session.login(find_demo_user("korian@lux-as.com").unwrap(), date(2025, 1, 6));
        session.record_entry(date(2025, 1, 6), DayEntry::default()).unwrap();
        session.save();
        session.logout();
        assert_eq!(session.gamification().xp, 60);
    }

    #[test]
    fn test_unreadable_stored_value_falls_back() {
        let store = MemoryStore::new();
        store.save(GAMIFICATION_KEY, &json!({"xp": "lots"})).unwrap();
        let session = open(store);
        assert_eq!(session.gamification(), &GamificationState::default());
    }

    #[test]
    fn test_configured_allowance_overrides_stored_one() {
        let mut session = open(MemoryStore::new());
        session
            .request_leave(LeaveKind::Annual, date(2025, 2, 10), date(2025, 2, 10), "Rendez-vous")
            .unwrap();
        assert_eq!(session.leave().balance().annual, 26.0);

        let copy = MemoryStore::new();
        copy.save(LEAVE_KEY, &session.store().load(LEAVE_KEY).unwrap().unwrap()).unwrap();
        let config = PortalConfig {
            annual_leave_days: 30.0,
            ..PortalConfig::default()
        };
        let reopened = Session::open(copy, HolidayCalendar::luxembourg_2025(), &config, january());

        let balance = reopened.leave().balance();
        assert_eq!(balance.annual, 30.0);
        assert_eq!(balance.remaining, 29.0);
        assert_eq!(reopened.leave().requests.len(), 1);
    }

    #[test]
    fn test_timesheet_filed_under_wrong_month_is_ignored() {
        let february = Period::new(2025, 2).unwrap();
        let mut session = open(MemoryStore::new());
        session.switch_period(february);
        session.record_entry(date(2025, 2, 3), DayEntry::default()).unwrap();
        let stored = session.store().load(&timesheet_key(february)).unwrap().unwrap();

        let store = MemoryStore::new();
        store.save(&timesheet_key(january()), &stored).unwrap();
        store.save(&timesheet_key(february), &stored).unwrap();
        let mut reopened = open(store);
        assert_eq!(reopened.timesheet().period, january());
        assert!(reopened.timesheet().entries.is_empty());

        reopened.switch_period(february);
        assert_eq!(reopened.timesheet().entries.len(), 1);
        reopened.switch_period(january());
        assert_eq!(reopened.timesheet().period, january());
        assert!(reopened.timesheet().entries.is_empty());
    }
}
