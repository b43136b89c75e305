use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type BadgeId = String;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GamificationState {
    pub xp: u32,
    pub streak: u32,
    pub unlocked_badges: BTreeSet<BadgeId>,
    pub last_login_date: Option<NaiveDate>,
    /// Successful timesheet submissions, feeds the submission badges.
    #[serde(default)]
    pub submitted: u32,
}

impl GamificationState {
    pub fn has_badge(&self, id: &str) -> bool {
        self.unlocked_badges.contains(id)
    }
}

/// One tier of the level curve. `max_xp == None` means unbounded.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub rank: u8,
    pub name: &'static str,
    pub icon: &'static str,
    pub min_xp: u32,
    pub max_xp: Option<u32>,
}

impl Level {
    pub fn contains(&self, xp: u32) -> bool {
        xp >= self.min_xp && self.max_xp.map_or(true, |max| xp <= max)
    }

    pub fn is_top(&self) -> bool {
        self.max_xp.is_none()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (niveau {})", self.icon, self.name, self.rank)
    }
}

pub const LEVELS: [Level; 5] = [
    Level { rank: 1, name: "Débutant", icon: "🌱", min_xp: 0, max_xp: Some(499) },
    Level { rank: 2, name: "Confirmé", icon: "🌿", min_xp: 500, max_xp: Some(1499) },
    Level { rank: 3, name: "Expert", icon: "⭐", min_xp: 1500, max_xp: Some(3499) },
    Level { rank: 4, name: "Master", icon: "💎", min_xp: 3500, max_xp: Some(6999) },
    Level { rank: 5, name: "Légende", icon: "👑", min_xp: 7000, max_xp: None },
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "Commun",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Épique",
            Rarity::Legendary => "Légendaire",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub xp_reward: u32,
    pub rarity: Rarity,
}

pub const FIRST_LOGIN: &str = "first-login";
pub const FIRST_TIMESHEET: &str = "first-timesheet";
pub const TIMESHEET_MASTER: &str = "timesheet-master";
pub const PUNCTUAL: &str = "punctual";
pub const STREAK_7: &str = "streak-7";
pub const STREAK_30: &str = "streak-30";
pub const ZERO_OVERTIME: &str = "zero-overtime";
pub const PROFILE_COMPLETE: &str = "profile-complete";
pub const EARLY_BIRD: &str = "early-bird";
pub const ANNIVERSARY: &str = "anniversary";

pub const BADGES: [Badge; 10] = [
    Badge {
        id: FIRST_LOGIN,
        name: "Bienvenue !",
        description: "Première connexion au portail",
        icon: "👋",
        xp_reward: 50,
        rarity: Rarity::Common,
    },
    Badge {
        id: FIRST_TIMESHEET,
        name: "Premier pas",
        description: "Premier timesheet soumis",
        icon: "📝",
        xp_reward: 100,
        rarity: Rarity::Common,
    },
    Badge {
        id: TIMESHEET_MASTER,
        name: "Timesheet Master",
        description: "10 timesheets soumis à temps",
        icon: "⏰",
        xp_reward: 300,
        rarity: Rarity::Rare,
    },
    Badge {
        id: PUNCTUAL,
        name: "Toujours à l'heure",
        description: "5 timesheets avant le 5 du mois",
        icon: "🎯",
        xp_reward: 200,
        rarity: Rarity::Rare,
    },
    Badge {
        id: STREAK_7,
        name: "Semaine parfaite",
        description: "7 jours de connexion consécutifs",
        icon: "🔥",
        xp_reward: 150,
        rarity: Rarity::Common,
    },
    Badge {
        id: STREAK_30,
        name: "Mois de feu",
        description: "30 jours de connexion consécutifs",
        icon: "🌟",
        xp_reward: 500,
        rarity: Rarity::Epic,
    },
    Badge {
        id: ZERO_OVERTIME,
        name: "Work-Life Balance",
        description: "Un mois sans heures supplémentaires",
        icon: "⚖️",
        xp_reward: 150,
        rarity: Rarity::Rare,
    },
    Badge {
        id: PROFILE_COMPLETE,
        name: "Profil complet",
        description: "Toutes les infos du profil renseignées",
        icon: "✨",
        xp_reward: 200,
        rarity: Rarity::Common,
    },
    Badge {
        id: EARLY_BIRD,
        name: "Lève-tôt",
        description: "Connexion avant 7h du matin",
        icon: "🐦",
        xp_reward: 100,
        rarity: Rarity::Rare,
    },
    Badge {
        id: ANNIVERSARY,
        name: "Anniversaire",
        description: "1 an sur le portail",
        icon: "🎂",
        xp_reward: 1000,
        rarity: Rarity::Legendary,
    },
];

pub fn badge_by_id(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// Notifications produced by gamification commands.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Event {
    LevelUp { from: Level, to: Level },
    BadgeUnlocked { badge: Badge },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::LevelUp { to, .. } => write!(f, "Niveau supérieur ! {}", to),
            Event::BadgeUnlocked { badge } => write!(
                f,
                "Badge débloqué : {} {} (+{} XP)",
                badge.icon, badge.name, badge.xp_reward
            ),
        }
    }
}

/// A new state together with the events its command signalled.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub state: T,
    pub events: Vec<Event>,
}

impl<T> Outcome<T> {
    pub fn quiet(state: T) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_contiguous_from_zero() {
        assert_eq!(LEVELS[0].min_xp, 0);
        for pair in LEVELS.windows(2) {
            assert_eq!(pair[0].max_xp.unwrap() + 1, pair[1].min_xp);
            assert!(pair[0].rank < pair[1].rank);
        }
        assert!(LEVELS[LEVELS.len() - 1].is_top());
    }

    #[test]
    fn test_badge_catalog_ids_are_unique() {
        let ids: BTreeSet<&str> = BADGES.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), BADGES.len());
        assert_eq!(badge_by_id(STREAK_30).unwrap().xp_reward, 500);
        assert!(badge_by_id("nope").is_none());
    }

    #[test]
    fn test_event_payload_shape() {
        let badge = *badge_by_id(FIRST_LOGIN).unwrap();
        let json = serde_json::to_value(Event::BadgeUnlocked { badge }).unwrap();
        assert_eq!(json["kind"], "badgeUnlocked");
        assert_eq!(json["data"]["badge"]["id"], FIRST_LOGIN);
    }
}
