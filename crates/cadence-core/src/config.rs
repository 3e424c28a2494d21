//! Scheduler Configuration
//!
//! Every tunable constant of the scheduling engine, with the standard
//! SM-2 and planning defaults. `SchedulerConfig::from_env()` layers
//! `CADENCE_*` environment variables over the defaults.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_TOPIC_DIFFICULTY, DEFAULT_TOPIC_HOURS};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum score (percent) counted as a passing review
pub const DEFAULT_PASS_THRESHOLD: f64 = 60.0;

/// Ease factor assigned to a topic on its first review
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Floor for the SM-2 ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease penalty applied on a failed review
pub const FAIL_EASE_PENALTY: f64 = 0.2;

/// Upper bound on modeled study hours per day
pub const MAX_DAILY_HOURS: f64 = 6.0;

/// Longest interval a passing review can schedule
pub const MAX_INTERVAL_DAYS: u32 = 365;

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

// ============================================================================
// QUALITY SCALE
// ============================================================================

/// How a 0-100 score is fed into the SM-2 ease-factor formula
///
/// The formula was designed for SM-2's 0-5 quality grades. `Sm2` rescales the
/// percentage to that range; `RawPercent` feeds the percentage unchanged,
/// which drives the ease factor straight to its floor on any pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityScale {
    #[default]
    Sm2,
    RawPercent,
}

impl QualityScale {
    /// Convert a percentage score into the formula's quality input
    #[inline]
    pub fn quality(&self, score: f64) -> f64 {
        match self {
            QualityScale::Sm2 => score / 20.0,
            QualityScale::RawPercent => score,
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sm2" => Some(QualityScale::Sm2),
            "raw" | "raw_percent" | "percent" => Some(QualityScale::RawPercent),
            _ => None,
        }
    }
}

// ============================================================================
// SCHEDULER CONFIG
// ============================================================================

/// Configuration shared by the review updater, capacity model and planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Scores at or above this count as a pass
    pub pass_threshold: f64,
    pub initial_ease_factor: f64,
    pub min_ease_factor: f64,
    pub fail_ease_penalty: f64,
    pub quality_scale: QualityScale,
    /// Cap on the interval a passing review can grow to
    pub max_interval_days: u32,
    /// Cap on daily study hours
    pub max_daily_hours: f64,
    /// Hours assumed for topics without an estimate
    pub default_topic_hours: f64,
    /// Difficulty assumed for topics without a rating
    pub default_topic_difficulty: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            initial_ease_factor: INITIAL_EASE_FACTOR,
            min_ease_factor: MIN_EASE_FACTOR,
            fail_ease_penalty: FAIL_EASE_PENALTY,
            quality_scale: QualityScale::default(),
            max_interval_days: MAX_INTERVAL_DAYS,
            max_daily_hours: MAX_DAILY_HOURS,
            default_topic_hours: DEFAULT_TOPIC_HOURS,
            default_topic_difficulty: DEFAULT_TOPIC_DIFFICULTY,
        }
    }
}

impl SchedulerConfig {
    /// Defaults overridden by `CADENCE_*` environment variables
    ///
    /// - `CADENCE_PASS_THRESHOLD` (percent)
    /// - `CADENCE_MAX_DAILY_HOURS`
    /// - `CADENCE_QUALITY_SCALE` (`sm2` or `raw`)
    /// - `CADENCE_DEFAULT_TOPIC_HOURS`
    /// - `CADENCE_MAX_INTERVAL_DAYS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_f64(&lookup, "CADENCE_PASS_THRESHOLD", 0.0..=100.0) {
            config.pass_threshold = v;
        }
        if let Some(v) = parse_f64(&lookup, "CADENCE_MAX_DAILY_HOURS", 0.0..=24.0) {
            config.max_daily_hours = v;
        }
        if let Some(v) = parse_f64(&lookup, "CADENCE_DEFAULT_TOPIC_HOURS", 0.0..=24.0) {
            config.default_topic_hours = v;
        }
        if let Some(v) = parse_f64(&lookup, "CADENCE_MAX_INTERVAL_DAYS", 1.0..=36500.0) {
            config.max_interval_days = v as u32;
        }
        if let Some(raw) = lookup("CADENCE_QUALITY_SCALE") {
            match QualityScale::parse_name(&raw) {
                Some(scale) => config.quality_scale = scale,
                None => tracing::warn!(value = %raw, "Ignoring unknown CADENCE_QUALITY_SCALE"),
            }
        }

        config
    }

    /// Check every value against the ranges the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(invalid("pass_threshold", "must be between 0 and 100"));
        }
        if !self.min_ease_factor.is_finite() || self.min_ease_factor < MIN_EASE_FACTOR {
            return Err(invalid(
                "min_ease_factor",
                format!("must be a finite value of at least {MIN_EASE_FACTOR}"),
            ));
        }
        if !self.initial_ease_factor.is_finite() || self.initial_ease_factor < self.min_ease_factor {
            return Err(invalid("initial_ease_factor", "must be at least min_ease_factor"));
        }
        if !self.fail_ease_penalty.is_finite() || self.fail_ease_penalty < 0.0 {
            return Err(invalid("fail_ease_penalty", "must be a non-negative number"));
        }
        if self.max_interval_days == 0 {
            return Err(invalid("max_interval_days", "must be at least 1"));
        }
        if !(0.0..=24.0).contains(&self.max_daily_hours) {
            return Err(invalid("max_daily_hours", "must be between 0 and 24"));
        }
        if !self.default_topic_hours.is_finite() || self.default_topic_hours < 0.0 {
            return Err(invalid("default_topic_hours", "must be a non-negative number"));
        }
        if !(1..=5).contains(&self.default_topic_difficulty) {
            return Err(invalid("default_topic_difficulty", "must be between 1 and 5"));
        }
        Ok(())
    }
}

fn parse_f64<F>(lookup: &F, key: &str, range: std::ops::RangeInclusive<f64>) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if range.contains(&v) => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

/// Resolve the directory that holds the review database
///
/// `CADENCE_DATA_DIR` wins; otherwise the platform data directory is used.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CADENCE_DATA_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "cadence", "core").map(|dirs| dirs.data_dir().to_path_buf())
}
