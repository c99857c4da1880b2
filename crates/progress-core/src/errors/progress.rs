// ABOUTME: Domain error kinds for personal records, streaks, milestones, and measurements
// ABOUTME: Carries enough context for callers to explain a rejection without a follow-up query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use crate::models::MetricKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which side of a measurement comparison could not be located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonEndpoint {
    /// No measurement on or after the start date inside the range
    Start,
    /// No measurement on or before the end date inside the range
    End,
    /// Both endpoints resolve to the same single measurement
    SingleMeasurement,
}

impl fmt::Display for ComparisonEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "no measurement at the start of the range"),
            Self::End => write!(f, "no measurement at the end of the range"),
            Self::SingleMeasurement => write!(f, "the range holds a single measurement"),
        }
    }
}

/// Errors returned by the analytics core.
///
/// `NotAnImprovement` is an expected outcome rather than a fault; use
/// [`ProgressError::is_informational`] to tell it apart.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Entity absent or owned by someone else
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of entity that was looked up
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },
    /// Malformed numeric or textual input
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Name of the offending input
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
    /// Milestone target is zero, negative, or not finite
    #[error("milestone target must be a finite value greater than zero, got {target_value}")]
    InvalidTarget {
        /// The rejected target
        target_value: f64,
    },
    /// Submitted result does not beat the stored best
    #[error("{candidate} does not beat the current {metric_kind} record of {current_best}")]
    NotAnImprovement {
        /// Metric kind being compared
        metric_kind: MetricKind,
        /// Submitted value
        candidate: f64,
        /// Value of the authoritative best record
        current_best: f64,
    },
    /// Comparison range lacks one of its endpoints
    #[error("insufficient data: {missing}")]
    InsufficientData {
        /// Which endpoint is missing
        missing: ComparisonEndpoint,
    },
    /// Metric kind tag not recognised
    #[error("unsupported metric kind '{kind}'")]
    UnsupportedMetricKind {
        /// The raw tag supplied by the caller
        kind: String,
    },
    /// Milestone is not active or was already achieved
    #[error("milestone {milestone_id} is already achieved or inactive")]
    AlreadyAchievedOrInactive {
        /// Milestone that refused the transition
        milestone_id: Uuid,
    },
    /// Storage collaborator failure
    #[error(transparent)]
    Storage(#[from] AppError),
}

impl ProgressError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create an "invalid value" error
    #[must_use]
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// True for outcomes that should be shown as information, not as a failure
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::NotAnImprovement { .. })
    }

    /// Error code this domain error maps to
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::ResourceNotFound,
            Self::InvalidValue { .. } => ErrorCode::InvalidInput,
            Self::InvalidTarget { .. } => ErrorCode::ValueOutOfRange,
            Self::NotAnImprovement { .. } => ErrorCode::NotAnImprovement,
            Self::InsufficientData { .. } => ErrorCode::InsufficientData,
            Self::UnsupportedMetricKind { .. } => ErrorCode::UnsupportedMetricKind,
            Self::AlreadyAchievedOrInactive { .. } => ErrorCode::InvalidStateTransition,
            Self::Storage(inner) => inner.code,
        }
    }
}

/// Result alias for core operations
pub type ProgressResult<T> = Result<T, ProgressError>;

impl From<ProgressError> for AppError {
    fn from(error: ProgressError) -> Self {
        let code = error.code();
        let message = error.to_string();
        let details = match &error {
            ProgressError::NotFound { resource, id } => json!({ "resource": resource, "id": id }),
            ProgressError::InvalidValue { field, reason } => {
                json!({ "field": field, "reason": reason })
            }
            ProgressError::InvalidTarget { target_value } => {
                json!({ "target_value": target_value })
            }
            ProgressError::NotAnImprovement {
                metric_kind,
                candidate,
                current_best,
            } => json!({
                "metric_kind": metric_kind,
                "candidate": candidate,
                "current_best": current_best,
            }),
            ProgressError::InsufficientData { missing } => json!({ "missing": missing }),
            ProgressError::UnsupportedMetricKind { kind } => json!({ "metric_kind": kind }),
            ProgressError::AlreadyAchievedOrInactive { milestone_id } => {
                json!({ "milestone_id": milestone_id })
            }
            ProgressError::Storage(_) => Value::Null,
        };

        match error {
            ProgressError::Storage(inner) => inner,
            _ => Self::new(code, message).with_details(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_an_improvement_is_informational() {
        let rejected = ProgressError::NotAnImprovement {
            metric_kind: MetricKind::Weight,
            candidate: 75.0,
            current_best: 80.0,
        };
        assert!(rejected.is_informational());
        assert!(!ProgressError::InvalidTarget { target_value: 0.0 }.is_informational());
        assert!(!ProgressError::Storage(AppError::database("down")).is_informational());
    }

    #[test]
    fn test_conversion_keeps_current_best_in_details() {
        let error: AppError = ProgressError::NotAnImprovement {
            metric_kind: MetricKind::TimeSeconds,
            candidate: 61.0,
            current_best: 58.5,
        }
        .into();

        assert_eq!(error.code, ErrorCode::NotAnImprovement);
        assert_eq!(error.details["current_best"], 58.5);
        assert_eq!(error.details["metric_kind"], "time_seconds");
    }

    #[test]
    fn test_storage_errors_pass_through_unchanged() {
        let error: AppError = ProgressError::Storage(AppError::database("locked")).into();
        assert_eq!(error.code, ErrorCode::DatabaseError);
        assert_eq!(error.message, "locked");
    }

    #[test]
    fn test_insufficient_data_names_missing_endpoint() {
        let error: AppError = ProgressError::InsufficientData {
            missing: ComparisonEndpoint::End,
        }
        .into();
        assert_eq!(error.details["missing"], "end");
    }
}
