// ABOUTME: Environment-based configuration for the progress analytics service
// ABOUTME: Loads storage settings, the reference time zone, and analytics windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Analytics configuration loaded from environment variables

use super::database::DatabaseConfig;
use crate::constants::{analytics, defaults, env_vars};
use crate::errors::{AppError, AppResult};
use chrono::{Duration, FixedOffset, Offset, Utc};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Storage settings
    pub database: DatabaseConfig,
    /// Analytics windows and the reference zone
    pub analytics: AnalyticsSettings,
}

impl AnalyticsConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid variable
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            database: DatabaseConfig::from_env()?,
            analytics: AnalyticsSettings::from_env()?,
        };
        info!(
            database = %config.database.url,
            max_connections = config.database.max_connections,
            reference_offset = %config.analytics.reference_offset,
            trend_window_days = config.analytics.trend_window_days,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Knobs for the analytics engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsSettings {
    /// Fixed zone that defines a civil day for streaks and summaries
    pub reference_offset: FixedOffset,
    /// Trailing window for measurement trends and stats
    pub trend_window_days: u32,
    /// Window counted as "recent" in record summaries
    pub recent_record_days: u32,
    /// Horizon for "upcoming" milestone deadlines
    pub upcoming_milestone_days: u32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            reference_offset: Utc.fix(),
            trend_window_days: defaults::TREND_WINDOW_DAYS,
            recent_record_days: defaults::RECENT_RECORD_DAYS,
            upcoming_milestone_days: defaults::UPCOMING_MILESTONE_DAYS,
        }
    }
}

impl AnalyticsSettings {
    /// Load analytics settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an offset is out of range or a window is zero
    pub fn from_env() -> AppResult<Self> {
        let offset_minutes = parse_env(
            env_vars::REFERENCE_UTC_OFFSET_MINUTES,
            defaults::REFERENCE_UTC_OFFSET_MINUTES,
        )?;

        Ok(Self {
            reference_offset: reference_offset(offset_minutes)?,
            trend_window_days: positive_days(
                env_vars::TREND_WINDOW_DAYS,
                defaults::TREND_WINDOW_DAYS,
            )?,
            recent_record_days: positive_days(
                env_vars::RECENT_RECORD_DAYS,
                defaults::RECENT_RECORD_DAYS,
            )?,
            upcoming_milestone_days: positive_days(
                env_vars::UPCOMING_MILESTONE_DAYS,
                defaults::UPCOMING_MILESTONE_DAYS,
            )?,
        })
    }

    /// "Recent records" window as a duration
    #[must_use]
    pub fn recent_record_window(&self) -> Duration {
        Duration::days(i64::from(self.recent_record_days))
    }
}

/// Build the reference zone from a signed minute offset
///
/// # Errors
///
/// Returns a configuration error outside +/-18 hours
pub fn reference_offset(minutes: i32) -> AppResult<FixedOffset> {
    if minutes.abs() > analytics::MAX_UTC_OFFSET_MINUTES {
        return Err(AppError::config(format!(
            "{} must be within +/-{} minutes, got {minutes}",
            env_vars::REFERENCE_UTC_OFFSET_MINUTES,
            analytics::MAX_UTC_OFFSET_MINUTES
        )));
    }
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
        AppError::config(format!(
            "Invalid {}: {minutes}",
            env_vars::REFERENCE_UTC_OFFSET_MINUTES
        ))
    })
}

/// Read an environment variable, falling back to `default` when unset
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
pub(crate) fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

fn positive_days(key: &str, default: u32) -> AppResult<u32> {
    let days = parse_env(key, default)?;
    if days == 0 {
        return Err(AppError::config(format!("{key} must be greater than zero")));
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_offset_bounds() {
        assert_eq!(reference_offset(0).unwrap(), Utc.fix());
        assert_eq!(reference_offset(-300).unwrap().local_minus_utc(), -300 * 60);
        assert_eq!(reference_offset(18 * 60).unwrap().local_minus_utc(), 18 * 3600);
        assert!(reference_offset(18 * 60 + 1).is_err());
        assert!(reference_offset(-(18 * 60 + 1)).is_err());
    }

    #[test]
    fn test_default_settings_use_utc() {
        let settings = AnalyticsSettings::default();
        assert_eq!(settings.reference_offset.local_minus_utc(), 0);
        assert_eq!(settings.recent_record_window(), Duration::days(30));
    }
}
