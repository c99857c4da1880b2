// ABOUTME: Tests for environment-driven configuration loading
// ABOUTME: Serialized because every test mutates process-wide environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use progress_analytics::config::environment::AnalyticsConfig;
use progress_analytics::config::DatabaseUrl;
use progress_analytics::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const VARS: [&str; 6] = [
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "PROGRESS_REFERENCE_UTC_OFFSET_MINUTES",
    "PROGRESS_TREND_WINDOW_DAYS",
    "PROGRESS_RECENT_RECORD_DAYS",
    "PROGRESS_UPCOMING_MILESTONE_DAYS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_nothing_is_set() {
    clear_env();
    let config = AnalyticsConfig::from_env().unwrap();

    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/progress.db")
        }
    );
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.analytics.reference_offset.local_minus_utc(), 0);
    assert_eq!(config.analytics.trend_window_days, 30);
    assert_eq!(config.analytics.recent_record_days, 30);
    assert_eq!(config.analytics.upcoming_milestone_days, 7);
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("DATABASE_MAX_CONNECTIONS", "8");
    env::set_var("PROGRESS_REFERENCE_UTC_OFFSET_MINUTES", "-300");
    env::set_var("PROGRESS_TREND_WINDOW_DAYS", "90");
    env::set_var("PROGRESS_UPCOMING_MILESTONE_DAYS", "14");

    let config = AnalyticsConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.database.url, DatabaseUrl::Memory);
    // In-memory databases cannot be shared across connections
    assert_eq!(config.database.max_connections, 1);
    assert_eq!(config.analytics.reference_offset.local_minus_utc(), -300 * 60);
    assert_eq!(config.analytics.trend_window_days, 90);
    assert_eq!(config.analytics.upcoming_milestone_days, 14);
}

#[test]
#[serial]
fn test_invalid_values_name_the_variable() {
    clear_env();

    env::set_var("PROGRESS_REFERENCE_UTC_OFFSET_MINUTES", "1200");
    let error = AnalyticsConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigError);
    assert!(error.message.contains("PROGRESS_REFERENCE_UTC_OFFSET_MINUTES"));
    clear_env();

    env::set_var("PROGRESS_TREND_WINDOW_DAYS", "0");
    let error = AnalyticsConfig::from_env().unwrap_err();
    assert!(error.message.contains("PROGRESS_TREND_WINDOW_DAYS"));
    clear_env();

    env::set_var("DATABASE_MAX_CONNECTIONS", "many");
    let error = AnalyticsConfig::from_env().unwrap_err();
    assert!(error.message.contains("DATABASE_MAX_CONNECTIONS"));
    clear_env();

    env::set_var("DATABASE_URL", "postgresql://localhost/progress");
    assert!(AnalyticsConfig::from_env().is_err());
    clear_env();
}
