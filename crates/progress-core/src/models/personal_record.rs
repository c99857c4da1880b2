// ABOUTME: Personal record rows and the submission payload that may create one
// ABOUTME: History is append-only; the authoritative best is derived by query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::MetricKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One accepted personal-record row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Exercise the record was set on
    pub exercise_id: Uuid,
    /// Dimension being tracked
    pub metric_kind: MetricKind,
    /// Recorded value in the kind's unit (kg, reps, seconds)
    pub value: f64,
    /// When the user achieved it
    pub achieved_at: DateTime<Utc>,
    /// Workout session that produced it, if any
    pub workout_log_id: Option<Uuid>,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

impl PersonalRecord {
    /// Build a fresh row from a submission
    #[must_use]
    pub fn from_submission(submission: &RecordSubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: submission.user_id,
            exercise_id: submission.exercise_id,
            metric_kind: submission.metric_kind,
            value: submission.value,
            achieved_at: submission.achieved_at,
            workout_log_id: submission.workout_log_id,
            created_at,
        }
    }
}

/// Caller input for a "is this a new best?" check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSubmission {
    /// Acting user
    pub user_id: Uuid,
    /// Exercise reference
    pub exercise_id: Uuid,
    /// Dimension being tracked
    pub metric_kind: MetricKind,
    /// Candidate value
    pub value: f64,
    /// When it was achieved
    pub achieved_at: DateTime<Utc>,
    /// Optional source workout session
    pub workout_log_id: Option<Uuid>,
}

/// Reference entry in the exercise catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
}

impl Exercise {
    /// Create a catalogue entry with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
