// ABOUTME: Database operations for workout logs
// ABOUTME: Serves the unbounded workout-date history that streaks are computed from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_timestamp, parse_timestamp, parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::WorkoutLog;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const WORKOUT_COLUMNS: &str = "id, user_id, workout_plan_id, workout_date, duration_minutes, \
     exercises_completed, notes, created_at";

impl Database {
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS workout_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_plan_id TEXT,
                workout_date TEXT NOT NULL,
                duration_minutes INTEGER CHECK (duration_minutes IS NULL OR duration_minutes >= 0),
                exercises_completed TEXT NOT NULL DEFAULT '[]',
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "workout_logs table",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_workout_logs_user_date \
             ON workout_logs(user_id, workout_date)",
            "workout_logs index",
        )
        .await
    }

    pub(crate) async fn insert_workout_log_impl(&self, log: &WorkoutLog) -> AppResult<()> {
        let exercises_json = serde_json::to_string(&log.exercises_completed)?;

        sqlx::query(
            r"
            INSERT INTO workout_logs (
                id, user_id, workout_plan_id, workout_date, duration_minutes,
                exercises_completed, notes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.workout_plan_id.map(|id| id.to_string()))
        .bind(format_timestamp(log.workout_date))
        .bind(log.duration_minutes.map(i64::from))
        .bind(&exercises_json)
        .bind(&log.notes)
        .bind(format_timestamp(log.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert workout log: {e}")))?;

        Ok(())
    }

    /// Every workout instant the user ever logged, newest first
    pub(crate) async fn workout_timestamps_impl(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let rows = sqlx::query(
            "SELECT workout_date FROM workout_logs WHERE user_id = $1 ORDER BY workout_date DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch workout dates: {e}")))?;

        rows.iter()
            .map(|row| {
                let raw: String = row.get("workout_date");
                parse_timestamp(&raw)
            })
            .collect()
    }

    pub(crate) async fn workout_logs_since_impl(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workout_logs \
             WHERE user_id = $1 AND workout_date >= $2 \
             ORDER BY workout_date DESC"
        ))
        .bind(user_id.to_string())
        .bind(format_timestamp(since))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch workout logs: {e}")))?;

        rows.iter().map(row_to_workout_log).collect()
    }

    pub(crate) async fn workout_logs_between_impl(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workout_logs \
             WHERE user_id = $1 AND workout_date >= $2 AND workout_date < $3 \
             ORDER BY workout_date ASC"
        ))
        .bind(user_id.to_string())
        .bind(format_timestamp(start))
        .bind(format_timestamp(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch workout logs: {e}")))?;

        rows.iter().map(row_to_workout_log).collect()
    }
}

fn row_to_workout_log(row: &SqliteRow) -> AppResult<WorkoutLog> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let workout_plan_id: Option<String> = row.get("workout_plan_id");
    let workout_date: String = row.get("workout_date");
    let duration_minutes: Option<i64> = row.get("duration_minutes");
    let exercises_json: String = row.get("exercises_completed");
    let created_at: String = row.get("created_at");

    Ok(WorkoutLog {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        workout_plan_id: workout_plan_id.as_deref().map(parse_uuid).transpose()?,
        workout_date: parse_timestamp(&workout_date)?,
        duration_minutes: duration_minutes
            .map(u32::try_from)
            .transpose()
            .map_err(|e| AppError::internal(format!("Invalid stored duration: {e}")))?,
        exercises_completed: serde_json::from_str(&exercises_json)?,
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
    })
}
