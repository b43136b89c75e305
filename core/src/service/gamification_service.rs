//! Gamification engine: XP, levels, badges and login streaks.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::model::gamification::{
    badge_by_id, BadgeId, Event, GamificationState, Level, Outcome, FIRST_LOGIN, FIRST_TIMESHEET,
    LEVELS, STREAK_30, STREAK_7, TIMESHEET_MASTER, ZERO_OVERTIME,
};
use crate::model::timesheet::TimesheetStats;

pub fn level_of(xp: u32) -> Level {
    match LEVELS.iter().find(|l| l.contains(xp)) {
        Some(level) => *level,
        None => {
            warn!(xp, "No level matches XP, falling back to the first level");
            LEVELS[0]
        }
    }
}

/// Percentage through the current level, 100 at the top level.
pub fn xp_progress(xp: u32) -> u32 {
    let level = level_of(xp);
    match level.max_xp {
        None => 100,
        Some(max) => {
            let span = (max - level.min_xp) as f64;
            let done = (xp - level.min_xp) as f64;
            ((done / span * 100.0).round() as u32).min(100)
        }
    }
}

/// XP still needed to reach the next level; one past the current maximum.
pub fn xp_to_next_level(xp: u32) -> u32 {
    match level_of(xp).max_xp {
        None => 0,
        Some(max) => max - xp + 1,
    }
}

pub fn award_xp(state: &GamificationState, amount: u32, reason: &str) -> Outcome<GamificationState> {
    let before = level_of(state.xp);
    let mut next = state.clone();
    next.xp = state.xp.saturating_add(amount);
    let after = level_of(next.xp);
    debug!(amount, reason, xp = next.xp, "XP awarded");

    let mut events = Vec::new();
    if after.rank > before.rank {
        info!(from = before.rank, to = after.rank, "Level up");
        events.push(Event::LevelUp { from: before, to: after });
    }
    Outcome { state: next, events }
}

pub fn unlock_badge(state: &GamificationState, badge_id: &str) -> Outcome<GamificationState> {
    if state.has_badge(badge_id) {
        return Outcome::quiet(state.clone());
    }

    let Some(badge) = badge_by_id(badge_id) else {
        warn!(badge_id, "Unknown badge, ignoring unlock");
        return Outcome::quiet(state.clone());
    };

    let mut unlocked = state.clone();
    unlocked.unlocked_badges.insert(badge.id.to_string());
    info!(badge = badge.id, "Badge unlocked");

    let mut outcome = award_xp(&unlocked, badge.xp_reward, badge.name);
    outcome.events.insert(0, Event::BadgeUnlocked { badge: *badge });
    outcome
}

/// At most one streak update per calendar day.
pub fn record_login(state: &GamificationState, today: NaiveDate) -> GamificationState {
    if state.last_login_date == Some(today) {
        return state.clone();
    }

    let mut next = state.clone();
    next.streak = match state.last_login_date {
        Some(last) if last == today - Duration::days(1) => state.streak + 1,
        _ => 1,
    };
    next.last_login_date = Some(today);
    debug!(streak = next.streak, %today, "Login recorded");
    next
}

/// Badges whose thresholds are met but which are not yet unlocked.
/// Pure; the caller unlocks each returned id.
pub fn check_eligible_badges(state: &GamificationState, stats: &TimesheetStats) -> BTreeSet<BadgeId> {
    let rules: [(&str, bool); 6] = [
        (FIRST_LOGIN, true),
        (FIRST_TIMESHEET, state.submitted >= 1),
        (TIMESHEET_MASTER, state.submitted >= 10),
        (STREAK_7, state.streak >= 7),
        (STREAK_30, state.streak >= 30),
        (
            ZERO_OVERTIME,
            stats.working_days > 0 && stats.is_complete() && stats.overtime_hours == 0.0,
        ),
    ];

    rules
        .into_iter()
        .filter(|(id, met)| *met && !state.has_badge(id))
        .map(|(id, _)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gamification::BADGES;

    fn state_with_xp(xp: u32) -> GamificationState {
        GamificationState { xp, ..Default::default() }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_level_of_boundaries() {
        assert_eq!(level_of(0).rank, 1);
        assert_eq!(level_of(499).rank, 1);
        assert_eq!(level_of(500).rank, 2);
        assert_eq!(level_of(1499).rank, 2);
        assert_eq!(level_of(1500).rank, 3);
        assert_eq!(level_of(6999).rank, 4);
        assert_eq!(level_of(7000).rank, 5);
        assert_eq!(level_of(u32::MAX).rank, 5);
    }

    #[test]
    fn test_levels_partition_xp() {
        for xp in (0..10_000).chain([u32::MAX - 1, u32::MAX]) {
            let matching = LEVELS.iter().filter(|l| l.contains(xp)).count();
            assert_eq!(matching, 1, "xp {}", xp);
        }
    }

    #[test]
    fn test_xp_progress_and_next_level() {
        assert_eq!(xp_progress(0), 0);
        assert_eq!(xp_progress(850), 35); // 350 / 999
        assert_eq!(xp_progress(1499), 100);
        assert_eq!(xp_progress(9000), 100);

        assert_eq!(xp_to_next_level(0), 500);
        assert_eq!(xp_to_next_level(490), 10);
        assert_eq!(xp_to_next_level(499), 1);
        assert_eq!(xp_to_next_level(850), 650);
        assert_eq!(xp_to_next_level(7000), 0);
    }

    #[test]
    fn test_award_xp_signals_level_up() {
        let outcome = award_xp(&state_with_xp(490), 15, "entry");
        assert_eq!(outcome.state.xp, 505);
        assert_eq!(level_of(505).min_xp, 500);
        assert_eq!(
            outcome.events,
            vec![Event::LevelUp { from: LEVELS[0], to: LEVELS[1] }]
        );

        let quiet = award_xp(&state_with_xp(500), 10, "entry");
        assert!(quiet.events.is_empty());
    }

    #[test]
    fn test_award_xp_across_several_levels() {
        let outcome = award_xp(&state_with_xp(0), 1600, "import");
        assert_eq!(
            outcome.events,
            vec![Event::LevelUp { from: LEVELS[0], to: LEVELS[2] }]
        );
    }

    #[test]
    fn test_unlock_badge_is_idempotent() {
        let once = unlock_badge(&state_with_xp(100), STREAK_7);
        assert_eq!(once.state.xp, 250);
        assert!(once.state.has_badge(STREAK_7));
        assert!(matches!(once.events[0], Event::BadgeUnlocked { badge } if badge.id == STREAK_7));

        let twice = unlock_badge(&once.state, STREAK_7);
        assert_eq!(twice.state, once.state);
        assert!(twice.events.is_empty());
    }

    #[test]
    fn test_unlock_badge_reward_can_level_up() {
        let outcome = unlock_badge(&state_with_xp(450), FIRST_TIMESHEET);
        assert_eq!(outcome.state.xp, 550);
        assert_eq!(outcome.events.len(), 2);
        assert!(matches!(outcome.events[0], Event::BadgeUnlocked { .. }));
        assert!(matches!(outcome.events[1], Event::LevelUp { .. }));
    }

    #[test]
    fn test_unlock_unknown_badge_is_noop() {
        let state = state_with_xp(10);
        let outcome = unlock_badge(&state, "moon-landing");
        assert_eq!(outcome.state, state);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_xp_is_monotonic() {
        let mut state = GamificationState::default();
        let mut last = state.xp;
        for badge in BADGES.iter() {
            state = award_xp(&state, 10, "tick").state;
            assert!(state.xp >= last);
            last = state.xp;
            state = unlock_badge(&state, badge.id).state;
            assert!(state.xp >= last);
            last = state.xp;
        }
    }

    #[test]
    fn test_record_login_streaks() {
        let today = date(2025, 3, 10);

        let first = record_login(&GamificationState::default(), today);
        assert_eq!(first.streak, 1);
        assert_eq!(first.last_login_date, Some(today));

        let consecutive = GamificationState {
            streak: 4,
            last_login_date: Some(today - Duration::days(1)),
            ..Default::default()
        };
        assert_eq!(record_login(&consecutive, today).streak, 5);

        let gap = GamificationState {
            streak: 4,
            last_login_date: Some(today - Duration::days(3)),
            ..Default::default()
        };
        assert_eq!(record_login(&gap, today).streak, 1);
    }

    #[test]
    fn test_record_login_same_day_is_noop() {
        let today = date(2025, 3, 10);
        let state = GamificationState {
            streak: 4,
            last_login_date: Some(today - Duration::days(1)),
            ..Default::default()
        };
        let once = record_login(&state, today);
        let twice = record_login(&once, today);
        assert_eq!(once.streak, 5);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_check_eligible_badges() {
        let stats = TimesheetStats::default();
        let fresh = GamificationState::default();
        assert_eq!(
            check_eligible_badges(&fresh, &stats),
            BTreeSet::from([FIRST_LOGIN.to_string()])
        );

        let veteran = GamificationState {
            streak: 30,
            submitted: 10,
            unlocked_badges: BTreeSet::from([FIRST_LOGIN.to_string(), STREAK_7.to_string()]),
            ..Default::default()
        };
        let eligible = check_eligible_badges(&veteran, &stats);
        assert_eq!(
            eligible,
            BTreeSet::from([
                FIRST_TIMESHEET.to_string(),
                STREAK_30.to_string(),
                TIMESHEET_MASTER.to_string(),
            ])
        );
    }

    #[test]
    fn test_zero_overtime_needs_complete_month() {
        let state = GamificationState {
            unlocked_badges: BTreeSet::from([FIRST_LOGIN.to_string()]),
            ..Default::default()
        };
        let complete = TimesheetStats {
            working_days: 22,
            filled_days: 22,
            total_hours: 176.0,
            overtime_hours: 0.0,
            expected_hours: 176.0,
            progress: 100,
        };
        assert!(check_eligible_badges(&state, &complete).contains(ZERO_OVERTIME));

        let with_overtime = TimesheetStats { overtime_hours: 2.0, ..complete };
        assert!(check_eligible_badges(&state, &with_overtime).is_empty());

        let partial = TimesheetStats { filled_days: 20, progress: 91, ..complete };
        assert!(check_eligible_badges(&state, &partial).is_empty());
    }
}
