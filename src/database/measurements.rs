// ABOUTME: Database operations for body measurements
// ABOUTME: Range queries order by measurement date then creation time for earliest/latest lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_date, format_timestamp, parse_date, parse_timestamp, parse_uuid, Database};
use crate::errors::{AppError, AppResult};
use crate::models::BodyMeasurement;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const MEASUREMENT_COLUMNS: &str = "id, user_id, measurement_date, weight, height, \
     body_fat_percentage, neck, chest, waist, hips, left_bicep, right_bicep, forearm, thigh, \
     calf, notes, created_at";

impl Database {
    pub(super) async fn migrate_measurements(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS body_measurements (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                measurement_date TEXT NOT NULL,
                weight REAL NOT NULL CHECK (weight > 0),
                height REAL,
                body_fat_percentage REAL,
                neck REAL,
                chest REAL,
                waist REAL,
                hips REAL,
                left_bicep REAL,
                right_bicep REAL,
                forearm REAL,
                thigh REAL,
                calf REAL,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "body_measurements table",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_body_measurements_user_date \
             ON body_measurements(user_id, measurement_date)",
            "body_measurements index",
        )
        .await
    }

    pub(crate) async fn insert_measurement_impl(
        &self,
        measurement: &BodyMeasurement,
    ) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO body_measurements ({MEASUREMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        ))
        .bind(measurement.id.to_string())
        .bind(measurement.user_id.to_string())
        .bind(format_date(measurement.measurement_date))
        .bind(measurement.weight)
        .bind(measurement.height)
        .bind(measurement.body_fat_percentage)
        .bind(measurement.neck)
        .bind(measurement.chest)
        .bind(measurement.waist)
        .bind(measurement.hips)
        .bind(measurement.left_bicep)
        .bind(measurement.right_bicep)
        .bind(measurement.forearm)
        .bind(measurement.thigh)
        .bind(measurement.calf)
        .bind(&measurement.notes)
        .bind(format_timestamp(measurement.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert body measurement: {e}")))?;

        Ok(())
    }

    /// All measurements with `start <= date <= end`, oldest first
    pub(crate) async fn measurements_in_range_impl(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<BodyMeasurement>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements \
             WHERE user_id = $1 AND measurement_date >= $2 AND measurement_date <= $3 \
             ORDER BY measurement_date ASC, created_at ASC"
        ))
        .bind(user_id.to_string())
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch body measurements: {e}")))?;

        rows.iter().map(row_to_measurement).collect()
    }

    pub(crate) async fn earliest_measurement_in_range_impl(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        self.range_endpoint(user_id, start, end, "ASC").await
    }

    pub(crate) async fn latest_measurement_in_range_impl(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        self.range_endpoint(user_id, start, end, "DESC").await
    }

    async fn range_endpoint(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        direction: &'static str,
    ) -> AppResult<Option<BodyMeasurement>> {
        let row = sqlx::query(&format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements \
             WHERE user_id = $1 AND measurement_date >= $2 AND measurement_date <= $3 \
             ORDER BY measurement_date {direction}, created_at {direction} \
             LIMIT 1"
        ))
        .bind(user_id.to_string())
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch body measurement: {e}")))?;

        row.as_ref().map(row_to_measurement).transpose()
    }
}

fn row_to_measurement(row: &SqliteRow) -> AppResult<BodyMeasurement> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let measurement_date: String = row.get("measurement_date");
    let created_at: String = row.get("created_at");

    Ok(BodyMeasurement {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        measurement_date: parse_date(&measurement_date)?,
        weight: row.get("weight"),
        height: row.get("height"),
        body_fat_percentage: row.get("body_fat_percentage"),
        neck: row.get("neck"),
        chest: row.get("chest"),
        waist: row.get("waist"),
        hips: row.get("hips"),
        left_bicep: row.get("left_bicep"),
        right_bicep: row.get("right_bicep"),
        forearm: row.get("forearm"),
        thigh: row.get("thigh"),
        calf: row.get("calf"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
    })
}
