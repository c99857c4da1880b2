// ABOUTME: Metric-kind aware ordering of personal record values
// ABOUTME: Decides whether a candidate beats the current best; ties never win
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{MetricKind, PersonalRecord};
use std::cmp::Ordering;

/// True when `candidate` strictly beats `current_best` for `kind`
///
/// Weight and reps improve upward, time improves downward. Equal values are
/// never an improvement.
#[must_use]
pub fn is_better(kind: MetricKind, candidate: f64, current_best: f64) -> bool {
    if kind.higher_is_better() {
        candidate > current_best
    } else {
        candidate < current_best
    }
}

/// Order two values so that the better one sorts first
#[must_use]
pub fn rank(kind: MetricKind, a: f64, b: f64) -> Ordering {
    if kind.higher_is_better() {
        b.total_cmp(&a)
    } else {
        a.total_cmp(&b)
    }
}

/// Order records best-first, breaking value ties by latest `achieved_at`,
/// then latest `created_at`
#[must_use]
pub fn compare_records(a: &PersonalRecord, b: &PersonalRecord) -> Ordering {
    rank(a.metric_kind, a.value, b.value)
        .then_with(|| b.achieved_at.cmp(&a.achieved_at))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Best record in `records` according to [`compare_records`]
pub fn best_of<'a, I>(records: I) -> Option<&'a PersonalRecord>
where
    I: IntoIterator<Item = &'a PersonalRecord>,
{
    records.into_iter().min_by(|a, b| compare_records(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_higher_is_better_kinds_are_monotonic_increasing() {
        for kind in [MetricKind::Weight, MetricKind::Reps] {
            let best = 50.0;
            let mut previous = false;
            for step in 0..200 {
                let candidate = f64::from(step) * 0.5;
                let current = is_better(kind, candidate, best);
                assert!(current >= previous, "{kind} flipped back at {candidate}");
                previous = current;
            }
            assert!(previous);
        }
    }

    #[test]
    fn test_time_is_monotonic_decreasing() {
        let best = 50.0;
        let mut previous = true;
        for step in 0..200 {
            let candidate = f64::from(step) * 0.5;
            let current = is_better(MetricKind::TimeSeconds, candidate, best);
            assert!(current <= previous, "time flipped back at {candidate}");
            previous = current;
        }
        assert!(!previous);
    }

    #[test]
    fn test_ties_are_never_better() {
        for kind in MetricKind::ALL {
            assert!(!is_better(kind, 42.0, 42.0));
        }
    }

    #[test]
    fn test_best_of_prefers_latest_on_equal_values() {
        let user = Uuid::new_v4();
        let exercise = Uuid::new_v4();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let make = |value: f64, offset_days: i64| PersonalRecord {
            id: Uuid::new_v4(),
            user_id: user,
            exercise_id: exercise,
            metric_kind: MetricKind::TimeSeconds,
            value,
            achieved_at: base + Duration::days(offset_days),
            workout_log_id: None,
            created_at: base + Duration::days(offset_days),
        };
        let records = [make(61.0, 0), make(58.0, 1), make(58.0, 5), make(70.0, 9)];

        let best = best_of(&records).unwrap();
        assert!((best.value - 58.0).abs() < f64::EPSILON);
        assert_eq!(best.achieved_at, base + Duration::days(5));
    }
}
