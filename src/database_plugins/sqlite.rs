// ABOUTME: SQLite implementation of the ProgressStore storage collaborator
// ABOUTME: Delegates every trait method to the Database query modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ProgressStore, RecordAppend};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{
    BodyMeasurement, Exercise, MetricKind, Milestone, PersonalRecord, WorkoutLog,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[async_trait]
impl ProgressStore for Database {
    async fn create_exercise(&self, exercise: &Exercise) -> AppResult<()> {
        self.create_exercise_impl(exercise).await
    }

    async fn exercise_exists(&self, exercise_id: Uuid) -> AppResult<bool> {
        self.exercise_exists_impl(exercise_id).await
    }

    async fn best_personal_record(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Option<PersonalRecord>> {
        self.best_personal_record_impl(user_id, exercise_id, metric_kind)
            .await
    }

    async fn append_personal_record(&self, record: &PersonalRecord) -> AppResult<()> {
        self.append_personal_record_impl(record).await
    }

    async fn append_if_improvement(&self, record: &PersonalRecord) -> AppResult<RecordAppend> {
        self.append_if_improvement_impl(record).await
    }

    async fn personal_record_history(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_kind: MetricKind,
    ) -> AppResult<Vec<PersonalRecord>> {
        self.personal_record_history_impl(user_id, exercise_id, metric_kind)
            .await
    }

    async fn personal_records_for_user(&self, user_id: Uuid) -> AppResult<Vec<PersonalRecord>> {
        self.personal_records_for_user_impl(user_id).await
    }

    async fn get_personal_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<Option<PersonalRecord>> {
        self.get_personal_record_impl(user_id, record_id).await
    }

    async fn update_personal_record(&self, record: &PersonalRecord) -> AppResult<bool> {
        self.update_personal_record_impl(record).await
    }

    async fn delete_personal_record(&self, user_id: Uuid, record_id: Uuid) -> AppResult<bool> {
        self.delete_personal_record_impl(user_id, record_id).await
    }

    async fn count_personal_records_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.count_personal_records_since_impl(user_id, since).await
    }

    async fn insert_workout_log(&self, log: &WorkoutLog) -> AppResult<()> {
        self.insert_workout_log_impl(log).await
    }

    async fn workout_timestamps(&self, user_id: Uuid) -> AppResult<Vec<DateTime<Utc>>> {
        self.workout_timestamps_impl(user_id).await
    }

    async fn workout_logs_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>> {
        self.workout_logs_since_impl(user_id, since).await
    }

    async fn workout_logs_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutLog>> {
        self.workout_logs_between_impl(user_id, start, end).await
    }

    async fn create_milestone(&self, milestone: &Milestone) -> AppResult<()> {
        self.create_milestone_impl(milestone).await
    }

    async fn get_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
    ) -> AppResult<Option<Milestone>> {
        self.get_milestone_impl(user_id, milestone_id).await
    }

    async fn list_milestones(&self, user_id: Uuid) -> AppResult<Vec<Milestone>> {
        self.list_milestones_impl(user_id).await
    }

    async fn set_milestone_current_value(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        current_value: f64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.set_milestone_current_value_impl(user_id, milestone_id, current_value, updated_at)
            .await
    }

    async fn mark_milestone_achieved(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        achieved_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.mark_milestone_achieved_impl(user_id, milestone_id, achieved_at)
            .await
    }

    async fn deactivate_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.deactivate_milestone_impl(user_id, milestone_id, updated_at)
            .await
    }

    async fn insert_measurement(&self, measurement: &BodyMeasurement) -> AppResult<()> {
        self.insert_measurement_impl(measurement).await
    }

    async fn measurements_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<BodyMeasurement>> {
        self.measurements_in_range_impl(user_id, start, end).await
    }

    async fn earliest_measurement_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        self.earliest_measurement_in_range_impl(user_id, start, end)
            .await
    }

    async fn latest_measurement_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        self.latest_measurement_in_range_impl(user_id, start, end)
            .await
    }
}
