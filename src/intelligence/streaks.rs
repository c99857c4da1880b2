// ABOUTME: Workout streaks, period summaries, and monthly calendars over a user's workout logs
// ABOUTME: Converts instants to civil dates in one reference zone before counting or grouping days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout streaks
//!
//! A streak is a run of consecutive civil days with at least one workout.
//! The current streak is live only if its latest day is `as_of` or the day
//! before. History is never pre-windowed: a streak that began months ago must
//! still be counted in full.

use super::civil_date;
use crate::database_plugins::ProgressStore;
use crate::errors::{ProgressError, ProgressResult};
use crate::models::WorkoutLog;
use chrono::{DateTime, Days, Duration, FixedOffset, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Distinct civil days on which a workout happened
#[must_use]
pub fn workout_days(timestamps: &[DateTime<Utc>], offset: FixedOffset) -> BTreeSet<NaiveDate> {
    timestamps
        .iter()
        .map(|timestamp| civil_date(*timestamp, offset))
        .collect()
}

/// Length of the streak that is live on `as_of`
///
/// Days after `as_of` are ignored. Returns 0 when the most recent day on or
/// before `as_of` is older than yesterday.
#[must_use]
pub fn current_streak(days: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> u32 {
    let mut history = days.range(..=as_of).rev();

    let Some(&latest) = history.next() else {
        return 0;
    };
    let yesterday = as_of.checked_sub_days(Days::new(1));
    if latest != as_of && Some(latest) != yesterday {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for &day in history {
        if previous.checked_sub_days(Days::new(1)) != Some(day) {
            break;
        }
        streak += 1;
        previous = day;
    }
    streak
}

/// Longest run of consecutive days anywhere in the history
#[must_use]
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        let continues = previous
            .and_then(|p| p.checked_add_days(Days::new(1)))
            .is_some_and(|next| next == day);
        run = if continues { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Current and longest streak plus the latest workout day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReport {
    /// Live streak length in days
    pub current_streak: u32,
    /// Longest streak ever
    pub longest_streak: u32,
    /// Most recent workout day, if any
    pub last_workout_date: Option<NaiveDate>,
}

/// Look-back period for a workout summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    /// Last seven days
    Week,
    /// Last calendar month
    #[default]
    Month,
    /// Last twelve months
    Year,
}

impl SummaryPeriod {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// First instant covered by the period ending at `now`
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = match self {
            Self::Week => now.checked_sub_signed(Duration::days(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryPeriod {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(ProgressError::invalid_value(
                "period",
                format!("expected week, month or year, got '{other}'"),
            )),
        }
    }
}

/// Totals over a set of workout logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Number of logs
    pub total_workouts: usize,
    /// Distinct civil days with a workout
    pub unique_days: usize,
    /// Sum of recorded durations
    pub total_duration_minutes: u64,
    /// Mean over logs that recorded a duration
    pub average_duration_minutes: Option<f64>,
    /// Personal record rows achieved in the same period
    pub personal_records: u64,
}

/// Running totals for one group of logs
#[derive(Default)]
struct DurationTotals {
    workouts: usize,
    timed: usize,
    minutes: u64,
}

impl DurationTotals {
    fn add(&mut self, log: &WorkoutLog) {
        self.workouts += 1;
        if let Some(minutes) = log.duration_minutes {
            self.timed += 1;
            self.minutes += u64::from(minutes);
        }
    }

    fn average(&self) -> Option<f64> {
        (self.timed > 0).then(|| self.minutes as f64 / self.timed as f64)
    }
}

/// Aggregate workout logs in the reference zone
#[must_use]
pub fn summarize_workouts(
    logs: &[WorkoutLog],
    personal_records: u64,
    offset: FixedOffset,
) -> WorkoutSummary {
    let mut totals = DurationTotals::default();
    for log in logs {
        totals.add(log);
    }
    let unique_days = logs
        .iter()
        .map(|log| civil_date(log.workout_date, offset))
        .collect::<BTreeSet<_>>()
        .len();

    WorkoutSummary {
        total_workouts: totals.workouts,
        unique_days,
        total_duration_minutes: totals.minutes,
        average_duration_minutes: totals.average(),
        personal_records,
    }
}

/// Workouts on one civil day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCalendarDay {
    /// Civil day in the reference zone
    pub date: NaiveDate,
    /// Sessions logged that day
    pub workout_count: usize,
    /// Sum of recorded durations
    pub total_duration_minutes: u64,
    /// Mean over sessions that recorded a duration
    pub average_duration_minutes: Option<f64>,
}

/// Group logs by civil day, oldest day first; days without logs are absent
#[must_use]
pub fn calendar_days(logs: &[WorkoutLog], offset: FixedOffset) -> Vec<WorkoutCalendarDay> {
    let mut days: BTreeMap<NaiveDate, DurationTotals> = BTreeMap::new();
    for log in logs {
        days.entry(civil_date(log.workout_date, offset))
            .or_default()
            .add(log);
    }

    days.into_iter()
        .map(|(date, totals)| WorkoutCalendarDay {
            date,
            workout_count: totals.workouts,
            total_duration_minutes: totals.minutes,
            average_duration_minutes: totals.average(),
        })
        .collect()
}

/// Half-open instant range `[start, end)` covering a calendar month in `offset`
///
/// # Errors
///
/// Returns `InvalidValue` when `year`/`month` do not name a representable month
pub fn month_bounds(
    year: i32,
    month: u32,
    offset: FixedOffset,
) -> ProgressResult<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || {
        ProgressError::invalid_value("month", format!("{year}-{month:02} is not a calendar month"))
    };
    let local_midnight = |day: NaiveDate| {
        day.and_hms_opt(0, 0, 0)
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(|local| local.with_timezone(&Utc))
    };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(invalid)?;
    let start = local_midnight(first).ok_or_else(invalid)?;
    let end = local_midnight(next).ok_or_else(invalid)?;
    Ok((start, end))
}

/// Streak queries over the storage collaborator
#[derive(Clone)]
pub struct StreakCalculator {
    store: Arc<dyn ProgressStore>,
    offset: FixedOffset,
}

impl StreakCalculator {
    /// Create a calculator that derives civil days in `offset`
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    async fn days(&self, user_id: Uuid) -> ProgressResult<BTreeSet<NaiveDate>> {
        let timestamps = self.store.workout_timestamps(user_id).await?;
        Ok(workout_days(&timestamps, self.offset))
    }

    /// Current streak as of the instant `as_of`
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn current_streak(&self, user_id: Uuid, as_of: DateTime<Utc>) -> ProgressResult<u32> {
        let days = self.days(user_id).await?;
        let as_of_day = civil_date(as_of, self.offset);
        let streak = current_streak(&days, as_of_day);
        debug!(%user_id, %as_of_day, workout_days = days.len(), streak, "Computed current streak");
        Ok(streak)
    }

    /// Longest streak in the user's history
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn longest_streak(&self, user_id: Uuid) -> ProgressResult<u32> {
        let days = self.days(user_id).await?;
        Ok(longest_streak(&days))
    }

    /// Current streak, longest streak, and last workout day in one read
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn streak_report(
        &self,
        user_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> ProgressResult<StreakReport> {
        let days = self.days(user_id).await?;
        let as_of_day = civil_date(as_of, self.offset);
        let report = StreakReport {
            current_streak: current_streak(&days, as_of_day),
            longest_streak: longest_streak(&days),
            last_workout_date: days.range(..=as_of_day).next_back().copied(),
        };
        debug!(%user_id, current = report.current_streak, longest = report.longest_streak, "Computed streak report");
        Ok(report)
    }

    /// Workout totals and record count for everything at or after `since`
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn workout_summary(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> ProgressResult<WorkoutSummary> {
        let logs = self.store.workout_logs_since(user_id, since).await?;
        let personal_records = self
            .store
            .count_personal_records_since(user_id, since)
            .await?;
        Ok(summarize_workouts(&logs, personal_records, self.offset))
    }

    /// Workout summary over a preset period ending at `now`
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn period_summary(
        &self,
        user_id: Uuid,
        period: SummaryPeriod,
        now: DateTime<Utc>,
    ) -> ProgressResult<WorkoutSummary> {
        let summary = self.workout_summary(user_id, period.start(now)).await?;
        debug!(%user_id, %period, workouts = summary.total_workouts, "Computed workout summary");
        Ok(summary)
    }

    /// Per-day workout counts and durations for one month in the reference zone
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a month outside 1-12, or `Storage`
    pub async fn workout_calendar(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> ProgressResult<Vec<WorkoutCalendarDay>> {
        let (start, end) = month_bounds(year, month, self.offset)?;
        let logs = self.store.workout_logs_between(user_id, start, end).await?;
        Ok(calendar_days(&logs, self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn days(list: &[u32]) -> BTreeSet<NaiveDate> {
        list.iter().map(|d| day(*d)).collect()
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        assert_eq!(current_streak(&days(&[10, 9, 8]), day(10)), 3);
    }

    #[test]
    fn test_gap_at_yesterday_leaves_streak_of_one() {
        assert_eq!(current_streak(&days(&[10, 8]), day(10)), 1);
    }

    #[test]
    fn test_streak_still_live_when_last_workout_was_yesterday() {
        assert_eq!(current_streak(&days(&[9, 8, 7]), day(10)), 3);
    }

    #[test]
    fn test_streak_broken_after_two_idle_days() {
        assert_eq!(current_streak(&days(&[8, 7, 6]), day(10)), 0);
    }

    #[test]
    fn test_empty_history_has_no_streak() {
        assert_eq!(current_streak(&BTreeSet::new(), day(10)), 0);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_days_after_as_of_are_ignored() {
        assert_eq!(current_streak(&days(&[12, 10, 9]), day(10)), 2);
    }

    #[test]
    fn test_several_workouts_on_one_day_count_once() {
        let timestamps = vec![
            Utc.with_ymd_and_hms(2025, 6, 10, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 19, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 9, 12, 0, 0).unwrap(),
        ];
        let utc = FixedOffset::east_opt(0).unwrap();
        let set = workout_days(&timestamps, utc);
        assert_eq!(set.len(), 2);
        assert_eq!(current_streak(&set, day(10)), 2);
    }

    #[test]
    fn test_reference_zone_decides_the_civil_day() {
        // 23:30 UTC on the 9th is already the 10th at UTC+2
        let timestamps = vec![
            Utc.with_ymd_and_hms(2025, 6, 9, 23, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap(),
        ];
        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(current_streak(&workout_days(&timestamps, utc), day(10)), 2);
        assert_eq!(current_streak(&workout_days(&timestamps, plus_two), day(10)), 1);
    }

    #[test]
    fn test_longest_streak_spans_month_boundary() {
        let set: BTreeSet<NaiveDate> = [
            NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            day(1),
            day(2),
            day(5),
        ]
        .into_iter()
        .collect();
        assert_eq!(longest_streak(&set), 4);
    }

    #[test]
    fn test_workout_summary_averages_recorded_durations_only() {
        let user = Uuid::new_v4();
        let at = |h| Utc.with_ymd_and_hms(2025, 6, 10, h, 0, 0).unwrap();
        let logs = vec![
            WorkoutLog::new(user, at(7)).with_duration(30),
            WorkoutLog::new(user, at(18)).with_duration(60),
            WorkoutLog::new(user, at(20)),
        ];
        let summary = summarize_workouts(&logs, 2, FixedOffset::east_opt(0).unwrap());
        assert_eq!(summary.total_workouts, 3);
        assert_eq!(summary.unique_days, 1);
        assert_eq!(summary.total_duration_minutes, 90);
        assert_eq!(summary.average_duration_minutes, Some(45.0));
        assert_eq!(summary.personal_records, 2);
    }

    #[test]
    fn test_calendar_groups_by_civil_day_in_offset() {
        let user = Uuid::new_v4();
        let logs = vec![
            WorkoutLog::new(user, Utc.with_ymd_and_hms(2025, 6, 9, 22, 0, 0).unwrap())
                .with_duration(40),
            WorkoutLog::new(user, Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap())
                .with_duration(20),
            WorkoutLog::new(user, Utc.with_ymd_and_hms(2025, 6, 12, 9, 0, 0).unwrap()),
        ];

        let utc = calendar_days(&logs, FixedOffset::east_opt(0).unwrap());
        assert_eq!(utc.len(), 3);
        assert_eq!(utc[0].date, day(9));

        // At UTC+3 the 22:00 session falls on the 10th
        let plus_three = calendar_days(&logs, FixedOffset::east_opt(3 * 3600).unwrap());
        assert_eq!(plus_three.len(), 2);
        assert_eq!(plus_three[0].date, day(10));
        assert_eq!(plus_three[0].workout_count, 2);
        assert_eq!(plus_three[0].total_duration_minutes, 60);
        assert_eq!(plus_three[0].average_duration_minutes, Some(30.0));
        assert_eq!(plus_three[1].workout_count, 1);
        assert_eq!(plus_three[1].average_duration_minutes, None);
    }

    #[test]
    fn test_month_bounds_follow_the_offset() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let (start, end) = month_bounds(2025, 12, minus_five).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 5, 0, 0).unwrap());

        assert!(matches!(
            month_bounds(2025, 13, minus_five),
            Err(ProgressError::InvalidValue { field: "month", .. })
        ));
        assert!(month_bounds(2025, 0, minus_five).is_err());
    }

    #[test]
    fn test_summary_period_start_and_parsing() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            SummaryPeriod::Week.start(now),
            Utc.with_ymd_and_hms(2025, 3, 24, 12, 0, 0).unwrap()
        );
        assert_eq!(
            SummaryPeriod::Month.start(now),
            Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()
        );
        assert_eq!(
            SummaryPeriod::Year.start(now),
            Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()
        );

        assert_eq!("Week".parse::<SummaryPeriod>().unwrap(), SummaryPeriod::Week);
        assert_eq!(SummaryPeriod::default(), SummaryPeriod::Month);
        assert!("fortnight".parse::<SummaryPeriod>().is_err());
    }
}
