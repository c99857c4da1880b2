// ABOUTME: Data models for personal records, workouts, milestones, and body measurements
// ABOUTME: Re-exports the entity structs and the enums that drive comparison and aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Every entity is owned by exactly one user and carries that user's id.
//! Timestamps are UTC instants; civil dates (measurement dates, milestone
//! deadlines) are plain `NaiveDate` values.

mod measurement;
mod metric;
mod milestone;
mod personal_record;
mod workout;

pub use measurement::{BodyMeasurement, MeasurementField};
pub use metric::MetricKind;
pub use milestone::{Milestone, MilestoneStatus, NewMilestone};
pub use personal_record::{Exercise, PersonalRecord, RecordSubmission};
pub use workout::WorkoutLog;
