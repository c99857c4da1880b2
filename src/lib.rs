// ABOUTME: Main library entry point for the progress analytics service
// ABOUTME: Personal records, workout streaks, milestone progress, and body measurement analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Progress Analytics
//!
//! The analytics core of a fitness tracking backend. Given a user's stored
//! history it decides whether a submitted result is a new personal best,
//! derives the current workout streak, tracks milestone completion, and
//! compares body measurements between two points in time.
//!
//! ## Architecture
//!
//! - **`progress_core`**: data model, metric comparator, error types
//! - **`database_plugins`**: the `ProgressStore` storage collaborator trait
//! - **`database`**: `SQLite` implementation of the store
//! - **`intelligence`**: the analytics engines built on top of a store
//! - **`config`** / **`logging`**: environment-driven setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use progress_analytics::config::environment::AnalyticsConfig;
//! use progress_analytics::database::Database;
//! use progress_analytics::errors::AppResult;
//! use progress_analytics::intelligence::ProgressAnalytics;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = AnalyticsConfig::from_env()?;
//!     let database = Database::new(&config.database).await?;
//!     let analytics = ProgressAnalytics::new(Arc::new(database), config.analytics);
//!
//!     let streak = analytics
//!         .streaks()
//!         .current_streak(uuid::Uuid::new_v4(), chrono::Utc::now())
//!         .await?;
//!     println!("streak: {streak} days");
//!     Ok(())
//! }
//! ```

/// Configuration loaded from the environment
pub mod config;

/// Re-exported constants from `progress_core`
pub mod constants;

/// `SQLite` storage for progress data
pub mod database;

/// Storage collaborator abstraction
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Analytics engines for records, streaks, milestones, and measurements
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Data models re-exported from `progress_core`
pub mod models {
    pub use progress_core::models::*;
}
