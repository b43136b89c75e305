//! TOML-based portal configuration.
//!
//! Stored at `<data_dir>/config.toml`; every field has a default so a
//! missing or partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::holiday::HolidayCalendar;
use crate::model::leave::DEFAULT_ANNUAL_ALLOWANCE;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "LUXAS_DATA_DIR";

/// XP granted for user actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    #[serde(default = "default_day_filled")]
    pub day_filled: u32,
    #[serde(default = "default_timesheet_submitted")]
    pub timesheet_submitted: u32,
    #[serde(default = "default_leave_requested")]
    pub leave_requested: u32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            day_filled: default_day_filled(),
            timesheet_submitted: default_timesheet_submitted(),
            leave_requested: default_leave_requested(),
        }
    }
}

fn default_day_filled() -> u32 {
    10
}
fn default_timesheet_submitted() -> u32 {
    50
}
fn default_leave_requested() -> u32 {
    20
}
fn default_annual_leave_days() -> f64 {
    DEFAULT_ANNUAL_ALLOWANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// JSON holiday calendar replacing the built-in Luxembourg list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays_file: Option<PathBuf>,
    #[serde(default = "default_annual_leave_days")]
    pub annual_leave_days: f64,
    #[serde(default)]
    pub rewards: Rewards,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            holidays_file: None,
            annual_leave_days: default_annual_leave_days(),
            rewards: Rewards::default(),
        }
    }
}

impl PortalConfig {
    /// Loads `config.toml` from `data_dir`, falling back to defaults when absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    pub fn holiday_calendar(&self) -> Result<HolidayCalendar> {
        match &self.holidays_file {
            Some(path) => HolidayCalendar::from_json_file(path),
            None => Ok(HolidayCalendar::luxembourg_2025()),
        }
    }
}

/// `$LUXAS_DATA_DIR`, else `~/.luxas`.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".luxas"))
}
