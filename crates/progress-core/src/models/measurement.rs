// ABOUTME: Body measurement snapshots and the fixed set of trackable fields
// ABOUTME: Weight is required; every circumference and composition field is optional
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::ProgressError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One body measurement snapshot
///
/// Several snapshots per user per day are allowed. "Earliest" and "latest"
/// order by `(measurement_date, created_at)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// Row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Civil date the measurement was taken
    pub measurement_date: NaiveDate,
    /// Body weight, always present
    pub weight: f64,
    /// Height
    pub height: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Neck circumference
    pub neck: Option<f64>,
    /// Chest circumference
    pub chest: Option<f64>,
    /// Waist circumference
    pub waist: Option<f64>,
    /// Hip circumference
    pub hips: Option<f64>,
    /// Left bicep circumference
    pub left_bicep: Option<f64>,
    /// Right bicep circumference
    pub right_bicep: Option<f64>,
    /// Forearm circumference
    pub forearm: Option<f64>,
    /// Thigh circumference
    pub thigh: Option<f64>,
    /// Calf circumference
    pub calf: Option<f64>,
    /// Free text
    pub notes: Option<String>,
    /// Insertion time, used as the same-day tiebreak
    pub created_at: DateTime<Utc>,
}

impl BodyMeasurement {
    /// Snapshot with only the required weight populated
    #[must_use]
    pub fn new(user_id: Uuid, measurement_date: NaiveDate, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            measurement_date,
            weight,
            height: None,
            body_fat_percentage: None,
            neck: None,
            chest: None,
            waist: None,
            hips: None,
            left_bicep: None,
            right_bicep: None,
            forearm: None,
            thigh: None,
            calf: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Value of `field`, `None` when not recorded
    #[must_use]
    pub const fn value_of(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Weight => Some(self.weight),
            MeasurementField::Height => self.height,
            MeasurementField::BodyFatPercentage => self.body_fat_percentage,
            MeasurementField::Neck => self.neck,
            MeasurementField::Chest => self.chest,
            MeasurementField::Waist => self.waist,
            MeasurementField::Hips => self.hips,
            MeasurementField::LeftBicep => self.left_bicep,
            MeasurementField::RightBicep => self.right_bicep,
            MeasurementField::Forearm => self.forearm,
            MeasurementField::Thigh => self.thigh,
            MeasurementField::Calf => self.calf,
        }
    }

    /// Fields that carry a value, in declaration order
    pub fn populated_fields(&self) -> impl Iterator<Item = (MeasurementField, f64)> + '_ {
        MeasurementField::ALL
            .iter()
            .filter_map(|field| self.value_of(*field).map(|value| (*field, value)))
    }
}

/// Numeric field of a [`BodyMeasurement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    /// Body weight
    Weight,
    /// Height
    Height,
    /// Body fat percentage
    BodyFatPercentage,
    /// Neck circumference
    Neck,
    /// Chest circumference
    Chest,
    /// Waist circumference
    Waist,
    /// Hip circumference
    Hips,
    /// Left bicep circumference
    LeftBicep,
    /// Right bicep circumference
    RightBicep,
    /// Forearm circumference
    Forearm,
    /// Thigh circumference
    Thigh,
    /// Calf circumference
    Calf,
}

impl MeasurementField {
    /// Every field, in declaration order
    pub const ALL: [Self; 12] = [
        Self::Weight,
        Self::Height,
        Self::BodyFatPercentage,
        Self::Neck,
        Self::Chest,
        Self::Waist,
        Self::Hips,
        Self::LeftBicep,
        Self::RightBicep,
        Self::Forearm,
        Self::Thigh,
        Self::Calf,
    ];

    /// Column and wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Height => "height",
            Self::BodyFatPercentage => "body_fat_percentage",
            Self::Neck => "neck",
            Self::Chest => "chest",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::LeftBicep => "left_bicep",
            Self::RightBicep => "right_bicep",
            Self::Forearm => "forearm",
            Self::Thigh => "thigh",
            Self::Calf => "calf",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementField {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                ProgressError::invalid_value("measurement_field", format!("unknown field '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in MeasurementField::ALL {
            assert_eq!(field.as_str().parse::<MeasurementField>().unwrap(), field);
        }
        assert!("shoulders".parse::<MeasurementField>().is_err());
    }

    #[test]
    fn test_populated_fields_skip_missing_values() {
        let mut measurement = BodyMeasurement::new(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            82.5,
        );
        measurement.waist = Some(90.0);

        let fields: Vec<_> = measurement.populated_fields().collect();
        assert_eq!(
            fields,
            vec![(MeasurementField::Weight, 82.5), (MeasurementField::Waist, 90.0)]
        );
    }
}
