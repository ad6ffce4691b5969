//! Configuration for the timeline planner.

use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from the platform config file, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::from_toml(&s).ok())
            .unwrap_or_default()
    }

    /// Parse and validate. Out-of-range timer durations are rejected.
    pub fn from_toml(content: &str) -> PlannerResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.timer.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> PlannerResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self) -> PlannerResult<()> {
        let path = Self::config_path()
            .ok_or_else(|| PlannerError::NotFound("config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "timeline-planner")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn db_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "timeline-planner")
            .map(|d| d.data_dir().join("planner.db"))
    }
}

/// Planning window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_start_month")]
    pub start_month: u32,
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_month")]
    pub end_month: u32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
}

fn default_start_month() -> u32 { 10 }
fn default_start_year() -> i32 { 2024 }
fn default_end_month() -> u32 { 12 }
fn default_end_year() -> i32 { 2025 }

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_month: 10,
            start_year: 2024,
            end_month: 12,
            end_year: 2025,
        }
    }
}

/// Longest accepted phase, one day.
pub const MAX_PHASE_MINS: u32 = 24 * 60;

/// Interval timer durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_mins")]
    pub work_mins: u32,
    #[serde(default = "default_break_mins")]
    pub break_mins: u32,
    #[serde(default = "default_long_break")]
    pub long_break_mins: u32,
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
}

fn default_work_mins() -> u32 { 25 }
fn default_break_mins() -> u32 { 5 }
fn default_long_break() -> u32 { 15 }
fn default_long_break_every() -> u32 { 4 }

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_mins: 25,
            break_mins: 5,
            long_break_mins: 15,
            long_break_every: 4,
        }
    }
}

impl TimerConfig {
    /// Durations must be 1 to [`MAX_PHASE_MINS`] minutes and the
    /// long-break cadence positive.
    pub fn validate(&self) -> PlannerResult<()> {
        let durations = [
            ("work_mins", self.work_mins),
            ("break_mins", self.break_mins),
            ("long_break_mins", self.long_break_mins),
        ];
        if let Some((name, value)) = durations
            .iter()
            .find(|(_, value)| !(1..=MAX_PHASE_MINS).contains(value))
        {
            return Err(PlannerError::Validation(format!(
                "{name} must be between 1 and {MAX_PHASE_MINS}, got {value}"
            )));
        }
        if self.long_break_every == 0 {
            return Err(PlannerError::Validation(
                "long_break_every must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
