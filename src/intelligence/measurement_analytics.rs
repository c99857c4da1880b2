// ABOUTME: Body measurement analytics: per-field trends, window statistics, and endpoint comparison
// ABOUTME: Missing fields are omitted from every result instead of defaulting to zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Measurement analytics
//!
//! Windows are trailing and inclusive: `[today - window_days, today]` in the
//! reference zone. A field that was never recorded inside a window or on
//! both comparison endpoints is simply absent from the output.

use super::civil_date;
use crate::constants::analytics::TREND_STABLE_THRESHOLD_PERCENT;
use crate::database_plugins::ProgressStore;
use crate::errors::{ComparisonEndpoint, ProgressError, ProgressResult};
use crate::models::{BodyMeasurement, MeasurementField};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// One point of a trend series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Measurement date
    pub date: NaiveDate,
    /// Field value on that date
    pub value: f64,
}

/// Direction of a field over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Last value is higher than the first by more than the threshold
    Increasing,
    /// Last value is lower than the first by more than the threshold
    Decreasing,
    /// Within the threshold, or a single observation
    Stable,
}

/// Aggregate over the populated occurrences of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Occurrences with a value
    pub count: usize,
    /// Mean value
    pub average: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// First vs last occurrence
    pub trend: TrendDirection,
}

/// Statistics for every field populated at least once in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStats {
    /// First day of the window
    pub window_start: NaiveDate,
    /// Last day of the window
    pub window_end: NaiveDate,
    /// Measurements inside the window
    pub measurement_count: usize,
    /// Per-field aggregates; unpopulated fields are absent
    pub fields: BTreeMap<MeasurementField, FieldStats>,
}

/// Difference between the first and last measurement of a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementComparison {
    /// Earliest measurement on or after the start date
    pub start: BodyMeasurement,
    /// Latest measurement on or before the end date
    pub end: BodyMeasurement,
    /// Calendar days between the two measurement dates
    pub days_between: i64,
    /// `end - start` for fields present on both sides
    pub changes: BTreeMap<MeasurementField, f64>,
    /// Relative change in percent; omitted when the start value is 0
    pub percent_changes: BTreeMap<MeasurementField, f64>,
}

/// Check every populated field of a measurement
///
/// # Errors
///
/// Returns `InvalidValue` when a value is not a finite positive number or
/// body fat exceeds 100%
pub fn validate_measurement(measurement: &BodyMeasurement) -> ProgressResult<()> {
    for field in MeasurementField::ALL {
        let Some(value) = measurement.value_of(field) else {
            continue;
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ProgressError::invalid_value(
                field.as_str(),
                format!("must be a finite number greater than zero, got {value}"),
            ));
        }
        if field == MeasurementField::BodyFatPercentage && value > 100.0 {
            return Err(ProgressError::invalid_value(
                field.as_str(),
                format!("must not exceed 100, got {value}"),
            ));
        }
    }
    Ok(())
}

/// First day of a trailing window ending on `today`
///
/// # Errors
///
/// Returns `InvalidValue` for a zero-length window
pub fn window_start(today: NaiveDate, window_days: u32) -> ProgressResult<NaiveDate> {
    if window_days == 0 {
        return Err(ProgressError::invalid_value(
            "window_days",
            "must be greater than zero",
        ));
    }
    Ok(today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN))
}

/// Populated values of `field`, oldest first
///
/// Input may be in any order; same-day points keep creation order.
#[must_use]
pub fn trend_series(measurements: &[BodyMeasurement], field: MeasurementField) -> Vec<TrendPoint> {
    let mut ordered: Vec<&BodyMeasurement> = measurements.iter().collect();
    ordered.sort_by_key(|m| (m.measurement_date, m.created_at));

    ordered
        .into_iter()
        .filter_map(|m| {
            m.value_of(field).map(|value| TrendPoint {
                date: m.measurement_date,
                value,
            })
        })
        .collect()
}

fn trend_direction(first: f64, last: f64) -> TrendDirection {
    let change = last - first;
    let relative = if first.abs() < f64::EPSILON {
        change
    } else {
        change / first.abs() * 100.0
    };

    if relative.abs() < TREND_STABLE_THRESHOLD_PERCENT {
        TrendDirection::Stable
    } else if relative > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}

fn field_stats(points: &[TrendPoint]) -> Option<FieldStats> {
    let first = points.first()?;
    let last = points.last()?;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for point in points {
        min = min.min(point.value);
        max = max.max(point.value);
        sum += point.value;
    }

    Some(FieldStats {
        count: points.len(),
        average: sum / points.len() as f64,
        min,
        max,
        trend: trend_direction(first.value, last.value),
    })
}

/// Aggregate every field over `measurements`
#[must_use]
pub fn measurement_stats(
    measurements: &[BodyMeasurement],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> MeasurementStats {
    let fields = MeasurementField::ALL
        .into_iter()
        .filter_map(|field| {
            field_stats(&trend_series(measurements, field)).map(|stats| (field, stats))
        })
        .collect();

    MeasurementStats {
        window_start,
        window_end,
        measurement_count: measurements.len(),
        fields,
    }
}

/// Compare two resolved endpoints
///
/// # Errors
///
/// Returns `InsufficientData` when both endpoints are the same measurement
pub fn compare_endpoints(
    start: BodyMeasurement,
    end: BodyMeasurement,
) -> ProgressResult<MeasurementComparison> {
    if start.id == end.id {
        return Err(ProgressError::InsufficientData {
            missing: ComparisonEndpoint::SingleMeasurement,
        });
    }

    let mut changes = BTreeMap::new();
    let mut percent_changes = BTreeMap::new();
    for field in MeasurementField::ALL {
        let (Some(before), Some(after)) = (start.value_of(field), end.value_of(field)) else {
            continue;
        };
        let delta = after - before;
        changes.insert(field, delta);
        if before.abs() >= f64::EPSILON {
            percent_changes.insert(field, delta / before * 100.0);
        }
    }

    Ok(MeasurementComparison {
        days_between: (end.measurement_date - start.measurement_date).num_days(),
        start,
        end,
        changes,
        percent_changes,
    })
}

/// Measurement operations over the storage collaborator
#[derive(Clone)]
pub struct MeasurementAnalytics {
    store: Arc<dyn ProgressStore>,
    offset: FixedOffset,
}

impl MeasurementAnalytics {
    /// Create an analytics engine deriving "today" in `offset`
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Validate and store a measurement
    ///
    /// # Errors
    ///
    /// `InvalidValue` or `Storage`
    pub async fn record_measurement(&self, measurement: &BodyMeasurement) -> ProgressResult<()> {
        validate_measurement(measurement)?;
        self.store.insert_measurement(measurement).await?;
        info!(
            user_id = %measurement.user_id,
            date = %measurement.measurement_date,
            weight = measurement.weight,
            "Body measurement recorded"
        );
        Ok(())
    }

    async fn window(
        &self,
        user_id: Uuid,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> ProgressResult<(NaiveDate, NaiveDate, Vec<BodyMeasurement>)> {
        let today = civil_date(now, self.offset);
        let start = window_start(today, window_days)?;
        let measurements = self
            .store
            .measurements_in_range(user_id, start, today)
            .await?;
        Ok((start, today, measurements))
    }

    /// Values of `field` inside the trailing window, oldest first
    ///
    /// Each call runs a fresh query.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a zero window, or `Storage`
    pub async fn trend(
        &self,
        user_id: Uuid,
        field: MeasurementField,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> ProgressResult<Vec<TrendPoint>> {
        let (_, _, measurements) = self.window(user_id, window_days, now).await?;
        let series = trend_series(&measurements, field);
        debug!(%user_id, %field, window_days, points = series.len(), "Trend computed");
        Ok(series)
    }

    /// Per-field aggregates inside the trailing window
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a zero window, or `Storage`
    pub async fn stats(
        &self,
        user_id: Uuid,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> ProgressResult<MeasurementStats> {
        let (start, end, measurements) = self.window(user_id, window_days, now).await?;
        Ok(measurement_stats(&measurements, start, end))
    }

    /// Compare the earliest and latest measurement inside `[start_date, end_date]`
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the range is reversed, `InsufficientData` when an
    /// endpoint is missing or both resolve to one measurement, or `Storage`
    pub async fn compare(
        &self,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ProgressResult<MeasurementComparison> {
        if start_date > end_date {
            return Err(ProgressError::invalid_value(
                "date_range",
                format!("start {start_date} is after end {end_date}"),
            ));
        }

        let start = self
            .store
            .earliest_measurement_in_range(user_id, start_date, end_date)
            .await?
            .ok_or(ProgressError::InsufficientData {
                missing: ComparisonEndpoint::Start,
            })?;
        let end = self
            .store
            .latest_measurement_in_range(user_id, start_date, end_date)
            .await?
            .ok_or(ProgressError::InsufficientData {
                missing: ComparisonEndpoint::End,
            })?;

        compare_endpoints(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn measurement(day: u32, weight: f64) -> BodyMeasurement {
        BodyMeasurement::new(Uuid::nil(), date(day), weight)
    }

    #[test]
    fn test_trend_skips_missing_values_and_orders_by_date() {
        let mut late = measurement(20, 80.0);
        late.waist = Some(88.0);
        let early_without_waist = measurement(5, 82.0);
        let mut middle = measurement(12, 81.0);
        middle.waist = Some(90.0);

        let series = trend_series(&[late, early_without_waist, middle], MeasurementField::Waist);
        assert_eq!(
            series,
            vec![
                TrendPoint { date: date(12), value: 90.0 },
                TrendPoint { date: date(20), value: 88.0 },
            ]
        );
    }

    #[test]
    fn test_stats_omit_fields_never_populated() {
        let mut a = measurement(1, 80.0);
        a.chest = Some(100.0);
        let b = measurement(2, 82.0);

        let stats = measurement_stats(&[a, b], date(1), date(30));
        assert_eq!(stats.measurement_count, 2);

        let weight = &stats.fields[&MeasurementField::Weight];
        assert_eq!(weight.count, 2);
        assert!((weight.average - 81.0).abs() < f64::EPSILON);
        assert!((weight.min - 80.0).abs() < f64::EPSILON);
        assert!((weight.max - 82.0).abs() < f64::EPSILON);
        assert_eq!(weight.trend, TrendDirection::Increasing);

        assert_eq!(stats.fields[&MeasurementField::Chest].count, 1);
        assert_eq!(stats.fields[&MeasurementField::Chest].trend, TrendDirection::Stable);
        assert!(!stats.fields.contains_key(&MeasurementField::Waist));
    }

    #[test]
    fn test_trend_direction_threshold() {
        assert_eq!(trend_direction(100.0, 100.4), TrendDirection::Stable);
        assert_eq!(trend_direction(100.0, 101.0), TrendDirection::Increasing);
        assert_eq!(trend_direction(100.0, 99.0), TrendDirection::Decreasing);
    }

    #[test]
    fn test_compare_only_reports_fields_on_both_sides() {
        let mut start = measurement(1, 80.0);
        start.waist = Some(90.0);
        let mut end = measurement(15, 78.0);
        end.chest = Some(101.0);
        end.created_at = start.created_at + Duration::seconds(1);

        let comparison = compare_endpoints(start, end).unwrap();
        assert_eq!(comparison.days_between, 14);
        assert_eq!(comparison.changes.len(), 1);
        assert!((comparison.changes[&MeasurementField::Weight] + 2.0).abs() < f64::EPSILON);
        assert!((comparison.percent_changes[&MeasurementField::Weight] + 2.5).abs() < 1e-9);
        assert!(!comparison.changes.contains_key(&MeasurementField::Waist));
        assert!(!comparison.changes.contains_key(&MeasurementField::Chest));
    }

    #[test]
    fn test_compare_same_measurement_is_insufficient() {
        let only = measurement(3, 75.0);
        let error = compare_endpoints(only.clone(), only).unwrap_err();
        assert!(matches!(
            error,
            ProgressError::InsufficientData {
                missing: ComparisonEndpoint::SingleMeasurement
            }
        ));
    }

    #[test]
    fn test_validation_rejects_non_positive_values() {
        let mut m = measurement(1, 80.0);
        assert!(validate_measurement(&m).is_ok());
        m.calf = Some(0.0);
        assert!(validate_measurement(&m).is_err());
        m.calf = None;
        m.body_fat_percentage = Some(120.0);
        assert!(validate_measurement(&m).is_err());
        assert!(validate_measurement(&measurement(1, f64::NAN)).is_err());
    }

    #[test]
    fn test_window_start_requires_positive_window() {
        assert_eq!(window_start(date(30), 29).unwrap(), date(1));
        assert!(window_start(date(30), 0).is_err());
    }
}
