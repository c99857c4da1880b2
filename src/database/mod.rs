// ABOUTME: SQLite storage for personal records, workouts, milestones, and body measurements
// ABOUTME: Owns the connection pool, schema migrations, and column encoding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! [`Database`] wraps a `SQLite` pool and implements the
//! [`ProgressStore`](crate::database_plugins::ProgressStore) collaborator.
//!
//! Column encodings keep lexical order equal to chronological order:
//! UUIDs are stored as hyphenated text, instants as fixed-width RFC 3339
//! with microseconds and a `Z` suffix, civil dates as `YYYY-MM-DD`.

mod measurements;
mod milestones;
mod personal_records;
mod workouts;

use crate::config::database::{DatabaseConfig, DatabaseUrl};
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// `SQLite` storage for progress data
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, creating the database file if needed, and apply migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let options = match &config.url {
            DatabaseUrl::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?,
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
            }
        }
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(defaults::SQLITE_BUSY_TIMEOUT_SECS));

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.url.is_memory() {
            // The database lives and dies with its single connection
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;

        info!(database = %config.url, "Database ready");
        Ok(database)
    }

    /// Connect to a private in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(&DatabaseConfig::in_memory()).await
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply all schema migrations; safe to run repeatedly
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_personal_records().await?;
        self.migrate_workouts().await?;
        self.migrate_milestones().await?;
        self.migrate_measurements().await?;
        Ok(())
    }

    async fn execute_ddl(&self, statement: &str, what: &str) -> AppResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create {what}: {e}")))?;
        Ok(())
    }
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime '{raw}': {e}")))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::internal(format!("Invalid date '{raw}': {e}")))
}

pub(crate) fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::internal(format!("Invalid UUID '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_are_fixed_width_and_sortable() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();

        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert_eq!(a, "2025-01-09T23:59:59.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(&b).unwrap(), later);
    }

    #[test]
    fn test_dates_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert_eq!(format_date(date), "2025-02-03");
        assert_eq!(parse_date("2025-02-03").unwrap(), date);
        assert!(parse_date("03/02/2025").is_err());
    }
}
