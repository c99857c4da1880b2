// ABOUTME: Storage collaborator abstraction for the analytics engines
// ABOUTME: Defines the ProgressStore trait every storage backend implements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use crate::models::{
    BodyMeasurement, Exercise, MetricKind, Milestone, PersonalRecord, WorkoutLog,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use progress_core::comparator::is_better;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared helpers for storage implementations
pub mod shared;
/// `SQLite` implementation of [`ProgressStore`]
pub mod sqlite;

/// Outcome of [`ProgressStore::append_if_improvement`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordAppend {
    /// The candidate beat the stored best (or none existed) and was stored
    Inserted,
    /// The stored best was not beaten; nothing was written
    Rejected {
        /// The authoritative best at decision time
        current_best: PersonalRecord,
    },
}

/// Return the stored best when `candidate` does not beat it
#[must_use]
pub fn unbeaten_best(
    candidate: &PersonalRecord,
    best: Option<PersonalRecord>,
) -> Option<PersonalRecord> {
    best.filter(|best| !is_better(candidate.metric_kind, candidate.value, best.value))
}

/// Storage collaborator used by the analytics engines
///
/// Every read and write is scoped by the owning user; rows that belong to
/// someone else behave as if they did not exist. Update and delete methods
/// return `false` when nothing matched.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    // ================================
    // Exercises & Personal Records
    // ================================

    /// Add an exercise to the catalogue
    async fn create_exercise(&self, exercise: &Exercise) -> AppResult<()>;

    /// Whether the exercise exists in the catalogue
    async fn exercise_exists(&self, exercise_id: Uuid) -> AppResult<bool>;

    /// Best record for the series, resolved over the full history
    ///
    /// Ordered by value in the kind's direction, ties broken by latest
    /// `achieved_at`, then latest `created_at`.
    async fn best_personal_record(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Option<PersonalRecord>>;

    /// Append a record row unconditionally
    async fn append_personal_record(&self, record: &PersonalRecord) -> AppResult<()>;

    /// Append `record` only if it beats the stored best, as one atomic step
    /// where the backend supports it
    async fn append_if_improvement(&self, record: &PersonalRecord) -> AppResult<RecordAppend>;

    /// Every record of one series, newest achievement first
    async fn personal_record_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Vec<PersonalRecord>>;

    /// Every record the user owns, newest achievement first
    async fn personal_records_for_user(&self, user_id: Uuid) -> AppResult<Vec<PersonalRecord>>;

    /// One record, if owned by `user_id`
    async fn get_personal_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<Option<PersonalRecord>>;

    /// Overwrite value, `achieved_at`, and workout reference of an owned record
    async fn update_personal_record(&self, record: &PersonalRecord) -> AppResult<bool>;

    /// Delete an owned record
    async fn delete_personal_record(&self, user_id: Uuid, record_id: Uuid) -> AppResult<bool>;

    /// Number of record rows achieved at or after `since`
    async fn count_personal_records_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<u64>;

    // ================================
    // Workout Logs
    // ================================

    /// Store a workout log
    async fn insert_workout_log(&self, log: &WorkoutLog) -> AppResult<()>;

    /// Every workout instant the user ever logged, newest first, unwindowed
    async fn workout_timestamps(&self, user_id: Uuid) -> AppResult<Vec<DateTime<Utc>>>;

    /// Workout logs at or after `since`, newest first
    async fn workout_logs_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>>;

    /// Workout logs with `start <= workout_date < end`, oldest first
    async fn workout_logs_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>>;

    // ================================
    // Milestones
    // ================================

    /// Store a new milestone
    async fn create_milestone(&self, milestone: &Milestone) -> AppResult<()>;

    /// One milestone, if owned by `user_id`
    async fn get_milestone(&self, user_id: Uuid, milestone_id: Uuid)
        -> AppResult<Option<Milestone>>;

    /// All milestones of a user, priority first
    async fn list_milestones(&self, user_id: Uuid) -> AppResult<Vec<Milestone>>;

    /// Overwrite the current value of an active milestone
    async fn set_milestone_current_value(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        current_value: f64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Mark an active, unachieved milestone achieved
    async fn mark_milestone_achieved(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        achieved_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Deactivate an active, unachieved milestone
    async fn deactivate_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    // ================================
    // Body Measurements
    // ================================

    /// Store a body measurement
    async fn insert_measurement(&self, measurement: &BodyMeasurement) -> AppResult<()>;

    /// Measurements dated within `[start, end]`, oldest first
    async fn measurements_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<BodyMeasurement>>;

    /// Earliest measurement in `[start, end]` by date, then creation time
    async fn earliest_measurement_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>>;

    /// Latest measurement in `[start, end]` by date, then creation time
    async fn latest_measurement_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: MetricKind, value: f64) -> PersonalRecord {
        PersonalRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            metric_kind: kind,
            value,
            achieved_at: Utc::now(),
            workout_log_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unbeaten_best_without_history_accepts() {
        assert!(unbeaten_best(&record(MetricKind::Weight, 10.0), None).is_none());
    }

    #[test]
    fn test_unbeaten_best_returns_stored_best_on_tie() {
        let best = record(MetricKind::Reps, 12.0);
        let blocking = unbeaten_best(&record(MetricKind::Reps, 12.0), Some(best.clone()));
        assert_eq!(blocking, Some(best));
    }

    #[test]
    fn test_unbeaten_best_follows_time_direction() {
        let best = record(MetricKind::TimeSeconds, 300.0);
        assert!(unbeaten_best(&record(MetricKind::TimeSeconds, 295.0), Some(best.clone())).is_none());
        assert!(unbeaten_best(&record(MetricKind::TimeSeconds, 305.0), Some(best)).is_some());
    }
}
