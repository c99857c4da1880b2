// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, seeded exercises, and analytics facades
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `progress_analytics`

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use progress_analytics::{
    config::environment::AnalyticsSettings,
    database::Database,
    database_plugins::ProgressStore,
    intelligence::ProgressAnalytics,
    models::{Exercise, MetricKind, RecordSubmission},
};
use std::env;
use std::sync::{Arc, Once};
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::in_memory().await?))
}

/// Analytics facade over a fresh in-memory database with default settings
pub async fn create_test_analytics() -> Result<(Arc<Database>, ProgressAnalytics)> {
    create_test_analytics_with(AnalyticsSettings::default()).await
}

/// Analytics facade over a fresh in-memory database with custom settings
pub async fn create_test_analytics_with(
    settings: AnalyticsSettings,
) -> Result<(Arc<Database>, ProgressAnalytics)> {
    let database = create_test_database().await?;
    let store: Arc<dyn ProgressStore> = database.clone();
    Ok((database, ProgressAnalytics::new(store, settings)))
}

/// Insert an exercise into the catalogue and return its ID
pub async fn create_test_exercise(database: &Database, name: &str) -> Result<Uuid> {
    let exercise = Exercise::new(name);
    database.create_exercise(&exercise).await?;
    Ok(exercise.id)
}

/// UTC instant on the given day of 2025 at the given hour
pub fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap()
}

/// Calendar date in 2025
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Submission of `value` for one series, achieved at `achieved_at`
pub fn submission(
    user_id: Uuid,
    exercise_id: Uuid,
    metric_kind: MetricKind,
    value: f64,
    achieved_at: DateTime<Utc>,
) -> RecordSubmission {
    RecordSubmission {
        user_id,
        exercise_id,
        metric_kind,
        value,
        achieved_at,
        workout_log_id: None,
    }
}
