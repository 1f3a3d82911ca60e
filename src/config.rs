//! Scheduler configuration.
//!
//! The warning period is a business threshold and lives with the schedule
//! (saved/loaded alongside the tasks). The poll interval is purely a poll
//! rate and the timezone only affects how deadline strings are read, so
//! those two live here instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::store::DEFAULT_WARNING_PERIOD_MINUTES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minutes-before-deadline threshold for approaching-deadline alerts.
    pub warning_period_minutes: i64,

    /// Cadence of the background deadline scan, in seconds.
    pub poll_interval_secs: u64,

    /// IANA timezone used to interpret "YYYY-MM-DD HH:MM" deadline strings.
    pub timezone: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            warning_period_minutes: DEFAULT_WARNING_PERIOD_MINUTES,
            poll_interval_secs: 15,
            timezone: "UTC".to_string(),
        }
    }
}

/// Read config from a TOML file; a missing file yields defaults.
pub fn load_config(path: &Path) -> Result<SchedulerConfig> {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(SchedulerConfig::default());
        }
        Err(e) => return Err(crate::codec::map_io(e, path)),
    };
    toml::from_str(&s).map_err(|e| SchedulerError::Parse(format!("config: {e}")))
}

pub fn save_config(path: &Path, cfg: &SchedulerConfig) -> Result<()> {
    let s = toml::to_string_pretty(cfg)
        .map_err(|e| SchedulerError::Parse(format!("config: {e}")))?;
    fs::write(path, s).map_err(|e| crate::codec::map_io(e, path))?;
    Ok(())
}
