// ABOUTME: Configuration management for the progress analytics service
// ABOUTME: Environment-only settings for storage and analytics windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! Configuration is read from environment variables only; there are no
//! config files.
//!
//! - **Environment**: top-level `AnalyticsConfig` and analytics windows
//! - **Database**: type-safe database URL and pool sizing

/// Database URL parsing and pool configuration
pub mod database;
/// Analytics configuration loaded from environment variables
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{AnalyticsConfig, AnalyticsSettings};
