use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Public holidays of one jurisdiction, keyed by date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HolidayCalendar {
    pub jurisdiction: String,
    holidays: BTreeMap<NaiveDate, Holiday>,
}

// (month, day, name, emoji)
const LUX_2025: [(u32, u32, &str, &str); 11] = [
    (1, 1, "Nouvel An", "🎉"),
    (4, 21, "Lundi de Pâques", "🐣"),
    (5, 1, "Fête du Travail", "⚒️"),
    (5, 9, "Journée de l'Europe", "🇪🇺"),
    (5, 29, "Ascension", "✨"),
    (6, 9, "Lundi de Pentecôte", "🕊️"),
    (6, 23, "Fête Nationale", "🇱🇺"),
    (8, 15, "Assomption", "⛪"),
    (11, 1, "Toussaint", "🕯️"),
    (12, 25, "Noël", "🎄"),
    (12, 26, "Saint-Étienne", "🎁"),
];

impl HolidayCalendar {
    pub fn new(jurisdiction: impl Into<String>, holidays: impl IntoIterator<Item = Holiday>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            holidays: holidays.into_iter().map(|h| (h.date, h)).collect(),
        }
    }

    /// Luxembourg public holidays for 2025.
    pub fn luxembourg_2025() -> Self {
        let holidays = LUX_2025.iter().filter_map(|(month, day, name, emoji)| {
            NaiveDate::from_ymd_opt(2025, *month, *day).map(|date| Holiday {
                date,
                name: name.to_string(),
                emoji: Some(emoji.to_string()),
            })
        });
        Self::new("LU", holidays)
    }

    /// Reads a JSON calendar of the form
    /// `{"jurisdiction": "LU", "holidays": [{"date": "2025-01-01", "name": "..."}]}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        #[derive(Deserialize)]
        struct RawCalendar {
            jurisdiction: String,
            holidays: Vec<Holiday>,
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read holiday calendar {}", path.display()))?;
        let raw: RawCalendar = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse holiday calendar {}", path.display()))?;
        Ok(Self::new(raw.jurisdiction, raw.holidays))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    pub fn holiday_info(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.get(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.values()
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}
