// ABOUTME: Subcommand handlers for progress-cli
// ABOUTME: Each handler runs one analytics query and returns its JSON representation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use progress_analytics::{
    errors::AppResult,
    intelligence::{ProgressAnalytics, SummaryPeriod},
    models::{MeasurementField, MetricKind},
};
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn streak(
    analytics: &ProgressAnalytics,
    user: Uuid,
    as_of: DateTime<Utc>,
) -> AppResult<Value> {
    let report = analytics.streaks().streak_report(user, as_of).await?;
    Ok(serde_json::to_value(report)?)
}

pub async fn summary(
    analytics: &ProgressAnalytics,
    user: Uuid,
    period: SummaryPeriod,
    now: DateTime<Utc>,
) -> AppResult<Value> {
    let summary = analytics.streaks().period_summary(user, period, now).await?;
    Ok(json!({ "period": period, "summary": summary }))
}

pub async fn calendar(
    analytics: &ProgressAnalytics,
    user: Uuid,
    year: i32,
    month: u32,
) -> AppResult<Value> {
    let days = analytics.streaks().workout_calendar(user, year, month).await?;
    Ok(json!({ "year": year, "month": month, "days": days }))
}

pub async fn best(
    analytics: &ProgressAnalytics,
    user: Uuid,
    exercise: Uuid,
    kind: MetricKind,
    history: bool,
) -> AppResult<Value> {
    let records = analytics.records();
    let best = records.best_record(user, exercise, kind).await?;

    if history {
        let rows = records.record_history(user, exercise, kind).await?;
        return Ok(json!({ "best": best, "history": rows }));
    }
    Ok(json!({ "best": best }))
}

pub async fn milestones(
    analytics: &ProgressAnalytics,
    user: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Value> {
    let engine = analytics.milestones();
    let summary = engine.milestone_summary(user, now).await?;
    let active = engine.active_progress(user, now).await?;
    Ok(json!({ "summary": summary, "active": active }))
}

pub async fn compare(
    analytics: &ProgressAnalytics,
    user: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Value> {
    let comparison = analytics.measurements().compare(user, start, end).await?;
    Ok(serde_json::to_value(comparison)?)
}

pub async fn stats(
    analytics: &ProgressAnalytics,
    user: Uuid,
    days: u32,
    field: Option<MeasurementField>,
    now: DateTime<Utc>,
) -> AppResult<Value> {
    let measurements = analytics.measurements();
    match field {
        Some(field) => {
            let series = measurements.trend(user, field, days, now).await?;
            Ok(json!({ "field": field, "window_days": days, "points": series }))
        }
        None => {
            let stats = measurements.stats(user, days, now).await?;
            Ok(serde_json::to_value(stats)?)
        }
    }
}
