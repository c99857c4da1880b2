// ABOUTME: Database operations for exercises and personal records
// ABOUTME: Best-record queries order by the metric kind's direction, newest achievement first on ties
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_timestamp, parse_timestamp, parse_uuid, Database};
use crate::database_plugins::shared::transactions::SqliteTransactionGuard;
use crate::database_plugins::{unbeaten_best, RecordAppend};
use crate::errors::{AppError, AppResult, ProgressError};
use crate::models::{Exercise, MetricKind, PersonalRecord};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};
use tracing::warn;
use uuid::Uuid;

const RECORD_COLUMNS: &str =
    "id, user_id, exercise_id, metric_kind, value, achieved_at, workout_log_id, created_at";

impl Database {
    pub(super) async fn migrate_personal_records(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            "exercises table",
        )
        .await?;

        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS personal_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                exercise_id TEXT NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                metric_kind TEXT NOT NULL CHECK (metric_kind IN ('weight', 'reps', 'time_seconds')),
                value REAL NOT NULL,
                achieved_at TEXT NOT NULL,
                workout_log_id TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "personal_records table",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_personal_records_lookup \
             ON personal_records(user_id, exercise_id, metric_kind)",
            "personal_records index",
        )
        .await
    }

    pub(crate) async fn create_exercise_impl(&self, exercise: &Exercise) -> AppResult<()> {
        sqlx::query("INSERT INTO exercises (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(exercise.id.to_string())
            .bind(&exercise.name)
            .bind(format_timestamp(Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;
        Ok(())
    }

    pub(crate) async fn exercise_exists_impl(&self, exercise_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM exercises WHERE id = $1")
            .bind(exercise_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up exercise: {e}")))?;
        Ok(row.is_some())
    }

    pub(crate) async fn best_personal_record_impl(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Option<PersonalRecord>> {
        fetch_best(&self.pool, user_id, exercise_id, metric_kind).await
    }

    pub(crate) async fn append_personal_record_impl(
        &self,
        record: &PersonalRecord,
    ) -> AppResult<()> {
        insert_record(&self.pool, record).await
    }

    /// Read-compare-insert inside `BEGIN IMMEDIATE`
    ///
    /// The write lock is taken before the read, so two concurrent submissions
    /// for the same series are serialized and the second one sees the first.
    pub(crate) async fn append_if_improvement_impl(
        &self,
        record: &PersonalRecord,
    ) -> AppResult<RecordAppend> {
        let mut transaction = SqliteTransactionGuard::begin_immediate(&self.pool).await?;

        match compare_and_insert(transaction.executor()?, record).await {
            Ok(outcome) => {
                transaction.commit().await?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback_error) = transaction.rollback().await {
                    warn!(error = %rollback_error, "Rollback after failed record append also failed");
                }
                Err(e)
            }
        }
    }

    pub(crate) async fn personal_record_history_impl(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Vec<PersonalRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM personal_records \
             WHERE user_id = $1 AND exercise_id = $2 AND metric_kind = $3 \
             ORDER BY achieved_at DESC, created_at DESC"
        ))
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .bind(metric_kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch record history: {e}")))?;

        rows.iter().map(row_to_personal_record).collect()
    }

    pub(crate) async fn personal_records_for_user_impl(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<PersonalRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM personal_records \
             WHERE user_id = $1 ORDER BY achieved_at DESC, created_at DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch personal records: {e}")))?;

        rows.iter().map(row_to_personal_record).collect()
    }

    pub(crate) async fn get_personal_record_impl(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<Option<PersonalRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM personal_records WHERE id = $1 AND user_id = $2"
        ))
        .bind(record_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get personal record: {e}")))?;

        row.as_ref().map(row_to_personal_record).transpose()
    }

    pub(crate) async fn update_personal_record_impl(
        &self,
        record: &PersonalRecord,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE personal_records
            SET value = $1, achieved_at = $2, workout_log_id = $3
            WHERE id = $4 AND user_id = $5
            ",
        )
        .bind(record.value)
        .bind(format_timestamp(record.achieved_at))
        .bind(record.workout_log_id.map(|id| id.to_string()))
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update personal record: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn delete_personal_record_impl(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM personal_records WHERE id = $1 AND user_id = $2")
            .bind(record_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete personal record: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn count_personal_records_since_impl(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM personal_records WHERE user_id = $1 AND achieved_at >= $2",
        )
        .bind(user_id.to_string())
        .bind(format_timestamp(since))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count personal records: {e}")))?;

        u64::try_from(count)
            .map_err(|e| AppError::internal(format!("Invalid personal record count: {e}")))
    }
}

async fn compare_and_insert(
    connection: &mut SqliteConnection,
    record: &PersonalRecord,
) -> AppResult<RecordAppend> {
    let best = fetch_best(
        &mut *connection,
        record.user_id,
        record.exercise_id,
        record.metric_kind,
    )
    .await?;

    if let Some(current_best) = unbeaten_best(record, best) {
        return Ok(RecordAppend::Rejected { current_best });
    }

    insert_record(&mut *connection, record).await?;
    Ok(RecordAppend::Inserted)
}

async fn fetch_best<'e, E>(
    executor: E,
    user_id: Uuid,
    exercise_id: Uuid,
    metric_kind: MetricKind,
) -> AppResult<Option<PersonalRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let direction = if metric_kind.higher_is_better() {
        "DESC"
    } else {
        "ASC"
    };

    let row = sqlx::query(&format!(
        "SELECT {RECORD_COLUMNS} FROM personal_records \
         WHERE user_id = $1 AND exercise_id = $2 AND metric_kind = $3 \
         ORDER BY value {direction}, achieved_at DESC, created_at DESC \
         LIMIT 1"
    ))
    .bind(user_id.to_string())
    .bind(exercise_id.to_string())
    .bind(metric_kind.as_str())
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::database(format!("Failed to fetch best personal record: {e}")))?;

    row.as_ref().map(row_to_personal_record).transpose()
}

async fn insert_record<'e, E>(executor: E, record: &PersonalRecord) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO personal_records (
            id, user_id, exercise_id, metric_kind, value, achieved_at, workout_log_id, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(record.exercise_id.to_string())
    .bind(record.metric_kind.as_str())
    .bind(record.value)
    .bind(format_timestamp(record.achieved_at))
    .bind(record.workout_log_id.map(|id| id.to_string()))
    .bind(format_timestamp(record.created_at))
    .execute(executor)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert personal record: {e}")))?;
    Ok(())
}

fn row_to_personal_record(row: &SqliteRow) -> AppResult<PersonalRecord> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let exercise_id: String = row.get("exercise_id");
    let metric_kind: String = row.get("metric_kind");
    let achieved_at: String = row.get("achieved_at");
    let workout_log_id: Option<String> = row.get("workout_log_id");
    let created_at: String = row.get("created_at");

    Ok(PersonalRecord {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        exercise_id: parse_uuid(&exercise_id)?,
        metric_kind: metric_kind
            .parse()
            .map_err(|e: ProgressError| AppError::internal(format!("Stored record has {e}")))?,
        value: row.get("value"),
        achieved_at: parse_timestamp(&achieved_at)?,
        workout_log_id: workout_log_id.as_deref().map(parse_uuid).transpose()?,
        created_at: parse_timestamp(&created_at)?,
    })
}
