// ABOUTME: Analytics engines for personal records, streaks, milestones, and body measurements
// ABOUTME: Provides the ProgressAnalytics facade wiring every engine to one storage collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Each engine is a thin async layer over pure functions. The pure functions
//! take `today` or `as_of` explicitly, so they can be tested without a
//! clock or a database. Civil dates are always derived in the configured
//! reference offset.

use crate::config::environment::AnalyticsSettings;
use crate::database_plugins::ProgressStore;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;

/// Body measurement trends, statistics, and comparisons
pub mod measurement_analytics;
/// Milestone progress and lifecycle transitions
pub mod milestone_progress;
/// Personal record gating and history
pub mod personal_records;
/// Workout streaks over the full history
pub mod streaks;

pub use measurement_analytics::{
    FieldStats, MeasurementAnalytics, MeasurementComparison, MeasurementStats, TrendDirection,
    TrendPoint,
};
pub use milestone_progress::{MilestoneEngine, MilestoneProgress, MilestoneSummary};
pub use personal_records::{PersonalRecordTracker, RecordSummary};
pub use streaks::{
    StreakCalculator, StreakReport, SummaryPeriod, WorkoutCalendarDay, WorkoutSummary,
};

/// Calendar date of `instant` in the reference zone
#[must_use]
pub fn civil_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Every analytics engine over a shared store
#[derive(Clone)]
pub struct ProgressAnalytics {
    records: PersonalRecordTracker,
    streaks: StreakCalculator,
    milestones: MilestoneEngine,
    measurements: MeasurementAnalytics,
    settings: AnalyticsSettings,
}

impl ProgressAnalytics {
    /// Build all engines from one store and one set of settings
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, settings: AnalyticsSettings) -> Self {
        let offset = settings.reference_offset;
        Self {
            records: PersonalRecordTracker::new(
                Arc::clone(&store),
                settings.recent_record_window(),
            ),
            streaks: StreakCalculator::new(Arc::clone(&store), offset),
            milestones: MilestoneEngine::new(
                Arc::clone(&store),
                offset,
                settings.upcoming_milestone_days,
            ),
            measurements: MeasurementAnalytics::new(store, offset),
            settings,
        }
    }

    /// Personal record tracker
    #[must_use]
    pub const fn records(&self) -> &PersonalRecordTracker {
        &self.records
    }

    /// Streak calculator
    #[must_use]
    pub const fn streaks(&self) -> &StreakCalculator {
        &self.streaks
    }

    /// Milestone engine
    #[must_use]
    pub const fn milestones(&self) -> &MilestoneEngine {
        &self.milestones
    }

    /// Measurement analytics
    #[must_use]
    pub const fn measurements(&self) -> &MeasurementAnalytics {
        &self.measurements
    }

    /// Settings the engines were built with
    #[must_use]
    pub const fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_civil_date_follows_reference_offset() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 23, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();

        assert_eq!(civil_date(instant, utc), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(civil_date(instant, tokyo), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(civil_date(instant, honolulu), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
