// ABOUTME: Integration tests for the SQLite storage collaborator
// ABOUTME: Covers file databases, idempotent migrations, and concurrent record submissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{at, create_test_exercise, init_test_logging, submission};
use progress_analytics::config::environment::AnalyticsSettings;
use progress_analytics::config::{DatabaseConfig, DatabaseUrl};
use progress_analytics::database::Database;
use progress_analytics::database_plugins::shared::transactions::SqliteTransactionGuard;
use progress_analytics::database_plugins::{ProgressStore, RecordAppend};
use progress_analytics::intelligence::ProgressAnalytics;
use progress_analytics::models::{MetricKind, PersonalRecord};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

async fn file_database(dir: &TempDir) -> Database {
    init_test_logging();
    let config = DatabaseConfig {
        url: DatabaseUrl::SQLite {
            path: dir.path().join("nested").join("progress.db"),
        },
        max_connections: 5,
    };
    Database::new(&config).await.unwrap()
}

#[tokio::test]
async fn test_file_database_is_created_and_reopened() {
    let dir = TempDir::new().unwrap();
    let user = Uuid::new_v4();

    let exercise_id = {
        let database = file_database(&dir).await;
        let exercise_id = create_test_exercise(&database, "Clean").await.unwrap();
        let record = PersonalRecord::from_submission(
            &submission(user, exercise_id, MetricKind::Weight, 70.0, at(1, 1, 9)),
            at(1, 1, 9),
        );
        database.append_personal_record(&record).await.unwrap();
        database.pool().close().await;
        exercise_id
    };

    // Reopening runs migrations again against existing tables
    let database = file_database(&dir).await;
    database.migrate().await.unwrap();
    assert!(database.exercise_exists(exercise_id).await.unwrap());
    let best = database
        .best_personal_record(user, exercise_id, MetricKind::Weight)
        .await
        .unwrap()
        .unwrap();
    assert!((best.value - 70.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_append_if_improvement_reports_current_best() {
    let database = common::create_test_database().await.unwrap();
    let exercise_id = create_test_exercise(&database, "Plank").await.unwrap();
    let user = Uuid::new_v4();

    let first = PersonalRecord::from_submission(
        &submission(user, exercise_id, MetricKind::TimeSeconds, 60.0, at(1, 1, 9)),
        at(1, 1, 9),
    );
    assert_eq!(
        database.append_if_improvement(&first).await.unwrap(),
        RecordAppend::Inserted
    );

    let slower = PersonalRecord::from_submission(
        &submission(user, exercise_id, MetricKind::TimeSeconds, 65.0, at(1, 2, 9)),
        at(1, 2, 9),
    );
    match database.append_if_improvement(&slower).await.unwrap() {
        RecordAppend::Rejected { current_best } => assert_eq!(current_best.id, first.id),
        RecordAppend::Inserted => panic!("slower time must not be stored"),
    }

    let history = database
        .personal_record_history(user, exercise_id, MetricKind::TimeSeconds)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_unfinished_transaction_rolls_back_and_keeps_in_memory_data() {
    let database = common::create_test_database().await.unwrap();
    let kept = create_test_exercise(&database, "Deadlift").await.unwrap();

    for _ in 0..20 {
        let uncommitted = Uuid::new_v4();
        {
            let mut guard = SqliteTransactionGuard::begin_immediate(database.pool())
                .await
                .unwrap();
            sqlx::query("INSERT INTO exercises (id, name, created_at) VALUES ($1, $2, $3)")
                .bind(uncommitted.to_string())
                .bind("Abandoned")
                .bind("2025-01-01T00:00:00.000000Z")
                .execute(guard.executor().unwrap())
                .await
                .unwrap();
            assert!(!guard.is_committed());
        }

        // Schema and committed rows survive; the dropped insert does not
        assert!(database.exercise_exists(kept).await.unwrap());
        assert!(!database.exercise_exists(uncommitted).await.unwrap());
    }
}

#[tokio::test]
async fn test_committed_transaction_is_visible() {
    let database = common::create_test_database().await.unwrap();
    let id = Uuid::new_v4();

    let mut guard = SqliteTransactionGuard::begin_immediate(database.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO exercises (id, name, created_at) VALUES ($1, $2, $3)")
        .bind(id.to_string())
        .bind("Row")
        .bind("2025-01-01T00:00:00.000000Z")
        .execute(guard.executor().unwrap())
        .await
        .unwrap();
    guard.commit().await.unwrap();

    assert!(database.exercise_exists(id).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_equal_submissions_store_one_record() {
    let dir = TempDir::new().unwrap();
    let database = Arc::new(file_database(&dir).await);
    let exercise_id = create_test_exercise(&database, "Snatch").await.unwrap();
    let user = Uuid::new_v4();
    let store: Arc<dyn ProgressStore> = database.clone();
    let analytics = ProgressAnalytics::new(store, AnalyticsSettings::default());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let analytics = analytics.clone();
            tokio::spawn(async move {
                analytics
                    .records()
                    .submit_record(&submission(
                        user,
                        exercise_id,
                        MetricKind::Weight,
                        100.0,
                        at(3, 1, 9),
                    ))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert!(e.is_informational(), "unexpected error: {e}"),
        }
    }
    assert_eq!(accepted, 1);

    let history = database
        .personal_record_history(user, exercise_id, MetricKind::Weight)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_concurrent_rising_submissions_always_keep_the_maximum() {
    let dir = TempDir::new().unwrap();
    let database = Arc::new(file_database(&dir).await);
    let exercise_id = create_test_exercise(&database, "Jerk").await.unwrap();
    let user = Uuid::new_v4();
    let store: Arc<dyn ProgressStore> = database.clone();
    let analytics = ProgressAnalytics::new(store, AnalyticsSettings::default());

    let handles: Vec<_> = (1..=12)
        .map(|step| {
            let analytics = analytics.clone();
            tokio::spawn(async move {
                analytics
                    .records()
                    .submit_record(&submission(
                        user,
                        exercise_id,
                        MetricKind::Weight,
                        f64::from(step) * 5.0,
                        at(3, 1, 9),
                    ))
                    .await
            })
        })
        .collect();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => {}
            Err(e) => assert!(e.is_informational(), "unexpected error: {e}"),
        }
    }

    let history = database
        .personal_record_history(user, exercise_id, MetricKind::Weight)
        .await
        .unwrap();
    let mut values: Vec<f64> = history.iter().map(|record| record.value).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    assert_eq!(values.len(), history.len());
    assert!(values.contains(&60.0));

    let best = database
        .best_personal_record(user, exercise_id, MetricKind::Weight)
        .await
        .unwrap()
        .unwrap();
    assert!((best.value - 60.0).abs() < f64::EPSILON);
}
