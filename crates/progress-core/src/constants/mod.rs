// ABOUTME: Constants for the progress analytics workspace organized by domain
// ABOUTME: Environment variable names, defaults, and analytics thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Pool size
    pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
    /// Fixed UTC offset, in minutes, used to derive civil dates
    pub const REFERENCE_UTC_OFFSET_MINUTES: &str = "PROGRESS_REFERENCE_UTC_OFFSET_MINUTES";
    /// Trailing window for measurement trends and stats
    pub const TREND_WINDOW_DAYS: &str = "PROGRESS_TREND_WINDOW_DAYS";
    /// Window counted as "recent" in record summaries
    pub const RECENT_RECORD_DAYS: &str = "PROGRESS_RECENT_RECORD_DAYS";
    /// Horizon for "upcoming" milestone deadlines
    pub const UPCOMING_MILESTONE_DAYS: &str = "PROGRESS_UPCOMING_MILESTONE_DAYS";
}

/// Defaults used when the environment is silent
pub mod defaults {
    /// Default on-disk database
    pub const DATABASE_URL: &str = "sqlite:./data/progress.db";
    /// Default pool size for file databases
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// Default reference zone is UTC
    pub const REFERENCE_UTC_OFFSET_MINUTES: i32 = 0;
    /// Default measurement window
    pub const TREND_WINDOW_DAYS: u32 = 30;
    /// Default "recent records" window
    pub const RECENT_RECORD_DAYS: u32 = 30;
    /// Default "upcoming milestone" horizon
    pub const UPCOMING_MILESTONE_DAYS: u32 = 7;
    /// `SQLite` busy timeout in seconds
    pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
}

/// Limits and thresholds for the analytics
pub mod analytics {
    /// Largest accepted reference offset (18 hours either side of UTC)
    pub const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;
    /// Relative change, in percent of the first value, below which a trend is stable
    pub const TREND_STABLE_THRESHOLD_PERCENT: f64 = 0.5;
}
