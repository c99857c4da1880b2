// ABOUTME: progress-cli - command-line access to the progress analytics engines
// ABOUTME: Reads a SQLite database and prints streaks, workouts, bests, milestones, and measurements as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Current and longest workout streak
//! progress-cli streak --user 3f0c...
//!
//! # Workout totals and personal records over the last week
//! progress-cli summary --user 3f0c... --period week
//!
//! # Per-day workouts in March 2025
//! progress-cli calendar --user 3f0c... --year 2025 --month 3
//!
//! # Best bench press weight
//! progress-cli best --user 3f0c... --exercise 9a1b... --kind weight
//!
//! # Milestone summary and progress of open milestones
//! progress-cli milestones --user 3f0c...
//!
//! # Body measurement change over a date range
//! progress-cli compare --user 3f0c... --start 2025-01-01 --end 2025-03-31
//!
//! # Per-field statistics over the trailing window
//! progress-cli stats --user 3f0c... --days 90
//! ```

mod commands;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use progress_analytics::{
    config::{environment::AnalyticsConfig, DatabaseUrl},
    database::Database,
    errors::{AppResult, ErrorResponse},
    intelligence::{ProgressAnalytics, SummaryPeriod},
    logging::{LogFormat, LoggingConfig},
    models::{MeasurementField, MetricKind},
};
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "progress-cli",
    about = "Progress analytics CLI",
    long_about = "Query personal records, workout streaks, milestones, and body measurements stored in a progress database."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Current and longest workout streak
    Streak {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Evaluate as of this instant (RFC 3339, defaults to now)
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
    },

    /// Workout totals and personal record count over a preset period
    Summary {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Period ending now (week, month, year)
        #[arg(long, default_value_t = SummaryPeriod::Month)]
        period: SummaryPeriod,
    },

    /// Per-day workout counts and durations for one month
    Calendar {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Calendar year
        #[arg(long)]
        year: i32,

        /// Month number (1-12)
        #[arg(long)]
        month: u32,
    },

    /// Best personal record of one exercise and metric kind
    Best {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Exercise ID
        #[arg(long)]
        exercise: Uuid,

        /// Metric kind (weight, reps, time_seconds)
        #[arg(long)]
        kind: MetricKind,

        /// Include the full record history
        #[arg(long)]
        history: bool,
    },

    /// Milestone summary and progress of open milestones
    Milestones {
        /// User ID
        #[arg(long)]
        user: Uuid,
    },

    /// Compare the first and last body measurement of a date range
    Compare {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the range (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },

    /// Per-field measurement statistics, or one field's trend with --field
    Stats {
        /// User ID
        #[arg(long)]
        user: Uuid,

        /// Trailing window in days (defaults to PROGRESS_TREND_WINDOW_DAYS)
        #[arg(long)]
        days: Option<u32>,

        /// Print the trend series of this field instead of statistics
        #[arg(long)]
        field: Option<MeasurementField>,
    },
}

fn init_logging(verbose: bool) {
    let mut logging = LoggingConfig::from_env();
    if verbose {
        logging.level = "debug".into();
    }
    if env::var("LOG_FORMAT").is_err() {
        logging.format = LogFormat::Compact;
    }
    if let Err(e) = logging.init() {
        eprintln!("Failed to initialize logging: {e}");
    }
}

async fn run(cli: Cli) -> AppResult<Value> {
    let mut config = AnalyticsConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = DatabaseUrl::parse_url(&url)?;
        if config.database.url.is_memory() {
            config.database.max_connections = 1;
        }
    }

    debug!(database = %config.database.url, "Opening progress database");
    let database = Database::new(&config.database).await?;
    let analytics = ProgressAnalytics::new(Arc::new(database), config.analytics);

    match cli.command {
        Command::Streak { user, as_of } => {
            commands::streak(&analytics, user, as_of.unwrap_or_else(Utc::now)).await
        }
        Command::Summary { user, period } => {
            commands::summary(&analytics, user, period, Utc::now()).await
        }
        Command::Calendar { user, year, month } => {
            commands::calendar(&analytics, user, year, month).await
        }
        Command::Best {
            user,
            exercise,
            kind,
            history,
        } => commands::best(&analytics, user, exercise, kind, history).await,
        Command::Milestones { user } => commands::milestones(&analytics, user, Utc::now()).await,
        Command::Compare { user, start, end } => {
            commands::compare(&analytics, user, start, end).await
        }
        Command::Stats { user, days, field } => {
            let days = days.unwrap_or(analytics.settings().trend_window_days);
            commands::stats(&analytics, user, days, field, Utc::now()).await
        }
    }
}

fn print_json(value: &impl Serialize) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match run(cli).await {
        Ok(output) => print_json(&output).map(|()| ExitCode::SUCCESS),
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            print_json(&ErrorResponse::from(e)).map(|()| ExitCode::FAILURE)
        }
    };

    outcome.unwrap_or_else(|e| {
        eprintln!("Failed to write output: {e}");
        ExitCode::FAILURE
    })
}
