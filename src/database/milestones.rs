// ABOUTME: Database operations for user milestones
// ABOUTME: State transitions are conditional updates so each one happens at most once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_date, format_timestamp, parse_date, parse_timestamp, parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Milestone;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const MILESTONE_COLUMNS: &str = "id, user_id, title, description, milestone_type, target_value, \
     current_value, target_date, is_achieved, achieved_at, category, priority, is_active, \
     created_at, updated_at";

impl Database {
    pub(super) async fn migrate_milestones(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS milestones (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                milestone_type TEXT NOT NULL,
                target_value REAL NOT NULL CHECK (target_value > 0),
                current_value REAL NOT NULL DEFAULT 0,
                target_date TEXT,
                is_achieved INTEGER NOT NULL DEFAULT 0,
                achieved_at TEXT,
                category TEXT,
                priority INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CHECK ((is_achieved = 0 AND achieved_at IS NULL)
                    OR (is_achieved = 1 AND achieved_at IS NOT NULL))
            )
            ",
            "milestones table",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_milestones_user ON milestones(user_id, is_active)",
            "milestones index",
        )
        .await
    }

    pub(crate) async fn create_milestone_impl(&self, milestone: &Milestone) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO milestones ({MILESTONE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        ))
        .bind(milestone.id.to_string())
        .bind(milestone.user_id.to_string())
        .bind(&milestone.title)
        .bind(&milestone.description)
        .bind(&milestone.milestone_type)
        .bind(milestone.target_value)
        .bind(milestone.current_value)
        .bind(milestone.target_date.map(format_date))
        .bind(milestone.is_achieved)
        .bind(milestone.achieved_at.map(format_timestamp))
        .bind(&milestone.category)
        .bind(milestone.priority)
        .bind(milestone.is_active)
        .bind(format_timestamp(milestone.created_at))
        .bind(format_timestamp(milestone.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create milestone: {e}")))?;

        Ok(())
    }

    pub(crate) async fn get_milestone_impl(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
    ) -> AppResult<Option<Milestone>> {
        let row = sqlx::query(&format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE id = $1 AND user_id = $2"
        ))
        .bind(milestone_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get milestone: {e}")))?;

        row.as_ref().map(row_to_milestone).transpose()
    }

    pub(crate) async fn list_milestones_impl(&self, user_id: Uuid) -> AppResult<Vec<Milestone>> {
        let rows = sqlx::query(&format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE user_id = $1 \
             ORDER BY priority DESC, target_date IS NULL, target_date ASC, created_at ASC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list milestones: {e}")))?;

        rows.iter().map(row_to_milestone).collect()
    }

    /// Overwrite the current value; only touches active milestones
    pub(crate) async fn set_milestone_current_value_impl(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        current_value: f64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE milestones
            SET current_value = $1, updated_at = $2
            WHERE id = $3 AND user_id = $4 AND is_active = 1
            ",
        )
        .bind(current_value)
        .bind(format_timestamp(updated_at))
        .bind(milestone_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update milestone progress: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip to achieved; only matches active, unachieved rows
    pub(crate) async fn mark_milestone_achieved_impl(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        achieved_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let achieved_at = format_timestamp(achieved_at);
        let result = sqlx::query(
            r"
            UPDATE milestones
            SET is_achieved = 1, achieved_at = $1, updated_at = $1
            WHERE id = $2 AND user_id = $3 AND is_active = 1 AND is_achieved = 0
            ",
        )
        .bind(&achieved_at)
        .bind(milestone_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark milestone achieved: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Abandon; only matches active, unachieved rows
    pub(crate) async fn deactivate_milestone_impl(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE milestones
            SET is_active = 0, updated_at = $1
            WHERE id = $2 AND user_id = $3 AND is_active = 1 AND is_achieved = 0
            ",
        )
        .bind(format_timestamp(updated_at))
        .bind(milestone_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to deactivate milestone: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_milestone(row: &SqliteRow) -> AppResult<Milestone> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let target_date: Option<String> = row.get("target_date");
    let achieved_at: Option<String> = row.get("achieved_at");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Milestone {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        title: row.get("title"),
        description: row.get("description"),
        milestone_type: row.get("milestone_type"),
        target_value: row.get("target_value"),
        current_value: row.get("current_value"),
        target_date: target_date.as_deref().map(parse_date).transpose()?,
        is_achieved: row.get("is_achieved"),
        achieved_at: achieved_at.as_deref().map(parse_timestamp).transpose()?,
        category: row.get("category"),
        priority: row.get("priority"),
        is_active: row.get("is_active"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
