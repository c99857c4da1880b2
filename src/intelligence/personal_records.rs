// ABOUTME: Personal record tracker gating new bests per (user, exercise, metric kind)
// ABOUTME: Rejects non-improvements with the current best and derives bests from full history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Personal record tracking
//!
//! History is append-only. The authoritative best of a series is always
//! resolved by querying the whole history with the comparator ordering, so
//! insertion order never implies superiority.

use crate::database_plugins::{ProgressStore, RecordAppend};
use crate::errors::{ProgressError, ProgressResult};
use crate::models::{MetricKind, PersonalRecord, RecordSubmission};
use chrono::{DateTime, Duration, Utc};
use progress_core::comparator::best_of;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Aggregate counts over a user's record history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Every stored record row
    pub total_records: usize,
    /// Row count per metric kind
    pub by_metric_kind: BTreeMap<MetricKind, usize>,
    /// Rows achieved inside the recent window
    pub recent_records: usize,
}

/// Reject zero, negative, and non-finite record values
///
/// # Errors
///
/// Returns `InvalidValue` naming `field`
pub fn validate_record_value(field: &'static str, value: f64) -> ProgressResult<()> {
    if !value.is_finite() {
        return Err(ProgressError::invalid_value(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(ProgressError::invalid_value(
            field,
            format!("must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}

/// Count records overall, per kind, and at or after `recent_since`
#[must_use]
pub fn summarize_records(records: &[PersonalRecord], recent_since: DateTime<Utc>) -> RecordSummary {
    let mut by_metric_kind = BTreeMap::new();
    for record in records {
        *by_metric_kind.entry(record.metric_kind).or_insert(0) += 1;
    }

    RecordSummary {
        total_records: records.len(),
        by_metric_kind,
        recent_records: records
            .iter()
            .filter(|record| record.achieved_at >= recent_since)
            .count(),
    }
}

/// Best record of every (exercise, metric kind) series in `records`
#[must_use]
pub fn bests_per_series(records: &[PersonalRecord]) -> Vec<PersonalRecord> {
    let mut series: HashMap<(Uuid, MetricKind), Vec<&PersonalRecord>> = HashMap::new();
    for record in records {
        series
            .entry((record.exercise_id, record.metric_kind))
            .or_default()
            .push(record);
    }

    let mut bests: Vec<PersonalRecord> = series
        .into_values()
        .filter_map(|group| best_of(group).cloned())
        .collect();
    bests.sort_by(|a, b| {
        a.exercise_id
            .cmp(&b.exercise_id)
            .then_with(|| a.metric_kind.cmp(&b.metric_kind))
    });
    bests
}

/// Gatekeeper for new personal records
#[derive(Clone)]
pub struct PersonalRecordTracker {
    store: Arc<dyn ProgressStore>,
    recent_window: Duration,
}

impl PersonalRecordTracker {
    /// Create a tracker over `store`; `recent_window` bounds "recent" in summaries
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, recent_window: Duration) -> Self {
        Self {
            store,
            recent_window,
        }
    }

    /// Submit a result and store it if it is a new personal best
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a zero, negative, or non-finite value
    /// - `NotFound` if the exercise does not exist
    /// - `NotAnImprovement` (informational) when the stored best is not beaten
    /// - `Storage` on collaborator failure
    pub async fn submit_record(
        &self,
        submission: &RecordSubmission,
    ) -> ProgressResult<PersonalRecord> {
        validate_record_value("value", submission.value)?;

        if !self.store.exercise_exists(submission.exercise_id).await? {
            return Err(ProgressError::not_found("exercise", submission.exercise_id));
        }

        let record = PersonalRecord::from_submission(submission, Utc::now());
        match self.store.append_if_improvement(&record).await? {
            RecordAppend::Inserted => {
                info!(
                    user_id = %record.user_id,
                    exercise_id = %record.exercise_id,
                    metric_kind = %record.metric_kind,
                    value = record.value,
                    record_id = %record.id,
                    "New personal record"
                );
                Ok(record)
            }
            RecordAppend::Rejected { current_best } => {
                info!(
                    user_id = %record.user_id,
                    exercise_id = %record.exercise_id,
                    metric_kind = %record.metric_kind,
                    value = record.value,
                    current_best = current_best.value,
                    "Submission does not beat the current personal record"
                );
                Err(ProgressError::NotAnImprovement {
                    metric_kind: record.metric_kind,
                    candidate: record.value,
                    current_best: current_best.value,
                })
            }
        }
    }

    /// Authoritative best of one series, `None` when the series is empty
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn best_record(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> ProgressResult<Option<PersonalRecord>> {
        Ok(self
            .store
            .best_personal_record(user_id, exercise_id, metric_kind)
            .await?)
    }

    /// Every accepted record of one series, newest first
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn record_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> ProgressResult<Vec<PersonalRecord>> {
        Ok(self
            .store
            .personal_record_history(user_id, exercise_id, metric_kind)
            .await?)
    }

    /// Best record of every series the user has
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn current_bests(&self, user_id: Uuid) -> ProgressResult<Vec<PersonalRecord>> {
        let records = self.store.personal_records_for_user(user_id).await?;
        Ok(bests_per_series(&records))
    }

    /// Totals per kind and the number of records in the recent window
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn record_summary(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<RecordSummary> {
        let records = self.store.personal_records_for_user(user_id).await?;
        let summary = summarize_records(&records, now - self.recent_window);
        debug!(%user_id, total = summary.total_records, recent = summary.recent_records, "Record summary");
        Ok(summary)
    }

    /// Owner-only corrective edit of a stored record
    ///
    /// The corrected value is not compared against other records; the best is
    /// re-derived from history on the next read.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a zero, negative, or non-finite value
    /// - `NotFound` if the record does not exist or belongs to someone else
    /// - `Storage` on collaborator failure
    pub async fn correct_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        value: f64,
        achieved_at: DateTime<Utc>,
    ) -> ProgressResult<PersonalRecord> {
        validate_record_value("value", value)?;

        let mut record = self
            .store
            .get_personal_record(user_id, record_id)
            .await?
            .ok_or_else(|| ProgressError::not_found("personal record", record_id))?;

        record.value = value;
        record.achieved_at = achieved_at;
        if !self.store.update_personal_record(&record).await? {
            return Err(ProgressError::not_found("personal record", record_id));
        }

        info!(%user_id, %record_id, value, "Personal record corrected");
        Ok(record)
    }

    /// Owner-only removal of a stored record
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record does not exist or belongs to someone else
    /// - `Storage` on collaborator failure
    pub async fn delete_record(&self, user_id: Uuid, record_id: Uuid) -> ProgressResult<()> {
        if !self.store.delete_personal_record(user_id, record_id).await? {
            return Err(ProgressError::not_found("personal record", record_id));
        }
        info!(%user_id, %record_id, "Personal record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(exercise_id: Uuid, kind: MetricKind, value: f64, day: u32) -> PersonalRecord {
        let at = Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap();
        PersonalRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_id,
            metric_kind: kind,
            value,
            achieved_at: at,
            workout_log_id: None,
            created_at: at,
        }
    }

    #[test]
    fn test_value_validation() {
        assert!(validate_record_value("value", 1.0).is_ok());
        assert!(validate_record_value("value", 0.0).is_err());
        assert!(validate_record_value("value", -5.0).is_err());
        assert!(validate_record_value("value", f64::NAN).is_err());
        assert!(validate_record_value("value", f64::INFINITY).is_err());
    }

    #[test]
    fn test_summary_counts_recent_window() {
        let squat = Uuid::new_v4();
        let records = vec![
            record(squat, MetricKind::Weight, 100.0, 1),
            record(squat, MetricKind::Reps, 8.0, 10),
            record(squat, MetricKind::Weight, 110.0, 20),
        ];
        let since = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();

        let summary = summarize_records(&records, since);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.by_metric_kind[&MetricKind::Weight], 2);
        assert_eq!(summary.by_metric_kind[&MetricKind::Reps], 1);
        assert_eq!(summary.recent_records, 2);
    }

    #[test]
    fn test_bests_per_series_uses_kind_direction() {
        let row = Uuid::new_v4();
        let records = vec![
            record(row, MetricKind::Weight, 60.0, 1),
            record(row, MetricKind::Weight, 70.0, 2),
            record(row, MetricKind::TimeSeconds, 420.0, 3),
            record(row, MetricKind::TimeSeconds, 400.0, 4),
            record(row, MetricKind::TimeSeconds, 410.0, 5),
        ];

        let bests = bests_per_series(&records);
        assert_eq!(bests.len(), 2);
        let weight = bests.iter().find(|r| r.metric_kind == MetricKind::Weight).unwrap();
        let time = bests.iter().find(|r| r.metric_kind == MetricKind::TimeSeconds).unwrap();
        assert!((weight.value - 70.0).abs() < f64::EPSILON);
        assert!((time.value - 400.0).abs() < f64::EPSILON);
    }
}
