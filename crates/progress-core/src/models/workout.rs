// ABOUTME: Workout log entries used as the date source for streaks
// ABOUTME: Completed exercises are kept as free-form JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A completed workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Plan the session followed, if any
    pub workout_plan_id: Option<Uuid>,
    /// When the session took place
    pub workout_date: DateTime<Utc>,
    /// Session length in minutes
    pub duration_minutes: Option<u32>,
    /// Structured record of completed exercises
    pub exercises_completed: Value,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

impl WorkoutLog {
    /// Minimal log for a session at `workout_date`
    #[must_use]
    pub fn new(user_id: Uuid, workout_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            workout_plan_id: None,
            workout_date,
            duration_minutes: None,
            exercises_completed: Value::Array(Vec::new()),
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Set the session length
    #[must_use]
    pub const fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}
