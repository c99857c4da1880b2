// ABOUTME: Metric kinds a personal record can track and their ordering direction
// ABOUTME: Parses the wire tags and rejects unknown kinds with UnsupportedMetricKind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::ProgressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dimension tracked by a personal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Load lifted; higher is better
    Weight,
    /// Repetitions completed; higher is better
    Reps,
    /// Elapsed time; lower is better
    TimeSeconds,
}

impl MetricKind {
    /// Every supported kind, in storage order
    pub const ALL: [Self; 3] = [Self::Weight, Self::Reps, Self::TimeSeconds];

    /// Wire and storage tag
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Reps => "reps",
            Self::TimeSeconds => "time_seconds",
        }
    }

    /// Whether a larger value beats a smaller one
    #[must_use]
    pub const fn higher_is_better(&self) -> bool {
        match self {
            Self::Weight | Self::Reps => true,
            Self::TimeSeconds => false,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(Self::Weight),
            "reps" => Ok(Self::Reps),
            "time_seconds" => Ok(Self::TimeSeconds),
            other => Err(ProgressError::UnsupportedMetricKind {
                kind: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let err = "distance".parse::<MetricKind>().unwrap_err();
        assert!(matches!(
            err,
            ProgressError::UnsupportedMetricKind { ref kind } if kind == "distance"
        ));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!("Weight".parse::<MetricKind>().is_err());
    }
}
