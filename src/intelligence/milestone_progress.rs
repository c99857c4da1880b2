// ABOUTME: Milestone progress engine computing completion percentage and days remaining
// ABOUTME: Owns the active -> achieved and active -> abandoned transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Milestone progress
//!
//! Percentages are not clamped: 120% means the goal was overshot.
//! A milestone leaves the active state at most once, either by being
//! achieved or by being abandoned; there is no way back.

use super::civil_date;
use crate::database_plugins::ProgressStore;
use crate::errors::{ProgressError, ProgressResult};
use crate::models::{Milestone, MilestoneStatus, NewMilestone};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Progress snapshot of one milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    /// Milestone the snapshot describes
    pub milestone_id: Uuid,
    /// Title, for display
    pub title: String,
    /// `current / target * 100`, may exceed 100
    pub percentage: f64,
    /// Whole days until the target date, never negative; `None` without a deadline
    pub days_remaining: Option<i64>,
    /// Lifecycle state
    pub status: MilestoneStatus,
}

/// Counts over a user's milestones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSummary {
    /// All milestones
    pub total: usize,
    /// Achieved milestones
    pub achieved: usize,
    /// Active and not yet achieved
    pub active: usize,
    /// Active, not achieved, deadline already passed
    pub overdue: usize,
    /// Active, not achieved, deadline within the upcoming horizon
    pub upcoming: usize,
    /// `achieved / total * 100`, 0 without milestones
    pub achievement_rate: f64,
}

fn validate_target(target_value: f64) -> ProgressResult<()> {
    if target_value.is_finite() && target_value > 0.0 {
        Ok(())
    } else {
        Err(ProgressError::InvalidTarget { target_value })
    }
}

fn validate_current(current_value: f64) -> ProgressResult<()> {
    if !current_value.is_finite() {
        return Err(ProgressError::invalid_value(
            "current_value",
            "must be a finite number",
        ));
    }
    if current_value < 0.0 {
        return Err(ProgressError::invalid_value(
            "current_value",
            format!("must not be negative, got {current_value}"),
        ));
    }
    Ok(())
}

/// Check a creation request
///
/// # Errors
///
/// `InvalidValue` for an empty title or a bad current value, `InvalidTarget`
/// for a target that is not a finite positive number
pub fn validate_new_milestone(request: &NewMilestone) -> ProgressResult<()> {
    if request.title.trim().is_empty() {
        return Err(ProgressError::invalid_value("title", "must not be empty"));
    }
    validate_target(request.target_value)?;
    validate_current(request.current_value)
}

/// Percentage and days remaining as of the civil day `today`
///
/// # Errors
///
/// Returns `InvalidTarget` when the target is zero, negative, or not finite
pub fn progress(milestone: &Milestone, today: NaiveDate) -> ProgressResult<MilestoneProgress> {
    validate_target(milestone.target_value)?;

    Ok(MilestoneProgress {
        milestone_id: milestone.id,
        title: milestone.title.clone(),
        percentage: milestone.current_value / milestone.target_value * 100.0,
        days_remaining: milestone
            .target_date
            .map(|target| (target - today).num_days().max(0)),
        status: milestone.status(),
    })
}

/// Flip an active, unachieved milestone to achieved
///
/// # Errors
///
/// Returns `AlreadyAchievedOrInactive` from any other state
pub fn achieve(milestone: &mut Milestone, now: DateTime<Utc>) -> ProgressResult<()> {
    if !milestone.can_be_achieved() {
        return Err(ProgressError::AlreadyAchievedOrInactive {
            milestone_id: milestone.id,
        });
    }
    milestone.is_achieved = true;
    milestone.achieved_at = Some(now);
    milestone.updated_at = now;
    Ok(())
}

/// Overwrite the current value of an active milestone
///
/// No monotonicity is enforced; measured quantities may move either way.
///
/// # Errors
///
/// `InvalidValue` for a negative or non-finite value,
/// `AlreadyAchievedOrInactive` when the milestone is inactive
pub fn update_progress(
    milestone: &mut Milestone,
    current_value: f64,
    now: DateTime<Utc>,
) -> ProgressResult<()> {
    validate_current(current_value)?;
    if !milestone.is_active {
        return Err(ProgressError::AlreadyAchievedOrInactive {
            milestone_id: milestone.id,
        });
    }
    milestone.current_value = current_value;
    milestone.updated_at = now;
    Ok(())
}

/// Abandon an active, unachieved milestone
///
/// # Errors
///
/// Returns `AlreadyAchievedOrInactive` from any other state
pub fn abandon(milestone: &mut Milestone, now: DateTime<Utc>) -> ProgressResult<()> {
    if !milestone.can_be_achieved() {
        return Err(ProgressError::AlreadyAchievedOrInactive {
            milestone_id: milestone.id,
        });
    }
    milestone.is_active = false;
    milestone.updated_at = now;
    Ok(())
}

/// Summarize milestones as of `today`
#[must_use]
pub fn summarize_milestones(
    milestones: &[Milestone],
    today: NaiveDate,
    upcoming_days: u32,
) -> MilestoneSummary {
    let horizon = today
        .checked_add_days(Days::new(u64::from(upcoming_days)))
        .unwrap_or(NaiveDate::MAX);
    let open: Vec<&Milestone> = milestones.iter().filter(|m| m.can_be_achieved()).collect();

    let total = milestones.len();
    let achieved = milestones.iter().filter(|m| m.is_achieved).count();

    MilestoneSummary {
        total,
        achieved,
        active: open.len(),
        overdue: open
            .iter()
            .filter(|m| m.target_date.is_some_and(|d| d < today))
            .count(),
        upcoming: open
            .iter()
            .filter(|m| m.target_date.is_some_and(|d| d >= today && d <= horizon))
            .count(),
        achievement_rate: if total == 0 {
            0.0
        } else {
            achieved as f64 / total as f64 * 100.0
        },
    }
}

/// Milestone operations over the storage collaborator
#[derive(Clone)]
pub struct MilestoneEngine {
    store: Arc<dyn ProgressStore>,
    offset: FixedOffset,
    upcoming_days: u32,
}

impl MilestoneEngine {
    /// Create an engine; `offset` defines "today", `upcoming_days` the summary horizon
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, offset: FixedOffset, upcoming_days: u32) -> Self {
        Self {
            store,
            offset,
            upcoming_days,
        }
    }

    async fn load(&self, user_id: Uuid, milestone_id: Uuid) -> ProgressResult<Milestone> {
        self.store
            .get_milestone(user_id, milestone_id)
            .await?
            .ok_or_else(|| ProgressError::not_found("milestone", milestone_id))
    }

    /// Validate and store a new active milestone
    ///
    /// # Errors
    ///
    /// Validation errors from [`validate_new_milestone`], or `Storage`
    pub async fn create_milestone(
        &self,
        user_id: Uuid,
        request: NewMilestone,
        now: DateTime<Utc>,
    ) -> ProgressResult<Milestone> {
        validate_new_milestone(&request)?;
        let milestone = Milestone::from_request(user_id, request, now);
        self.store.create_milestone(&milestone).await?;
        info!(%user_id, milestone_id = %milestone.id, target = milestone.target_value, "Milestone created");
        Ok(milestone)
    }

    /// Progress of one owned milestone
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTarget`, or `Storage`
    pub async fn progress(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<MilestoneProgress> {
        let milestone = self.load(user_id, milestone_id).await?;
        progress(&milestone, civil_date(now, self.offset))
    }

    /// Mark an owned milestone achieved
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadyAchievedOrInactive`, or `Storage`
    pub async fn achieve(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<Milestone> {
        let mut milestone = self.load(user_id, milestone_id).await?;
        achieve(&mut milestone, now)?;

        // The conditional update loses if another caller got there first
        if !self
            .store
            .mark_milestone_achieved(user_id, milestone_id, now)
            .await?
        {
            return Err(ProgressError::AlreadyAchievedOrInactive { milestone_id });
        }

        info!(%user_id, %milestone_id, "Milestone achieved");
        Ok(milestone)
    }

    /// Overwrite the current value of an owned, active milestone
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidValue`, `AlreadyAchievedOrInactive`, or `Storage`
    pub async fn update_progress(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        current_value: f64,
        now: DateTime<Utc>,
    ) -> ProgressResult<Milestone> {
        let mut milestone = self.load(user_id, milestone_id).await?;
        update_progress(&mut milestone, current_value, now)?;

        if !self
            .store
            .set_milestone_current_value(user_id, milestone_id, current_value, now)
            .await?
        {
            return Err(ProgressError::AlreadyAchievedOrInactive { milestone_id });
        }

        debug!(%user_id, %milestone_id, current_value, "Milestone progress updated");
        Ok(milestone)
    }

    /// Abandon an owned, active, unachieved milestone
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadyAchievedOrInactive`, or `Storage`
    pub async fn deactivate(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<Milestone> {
        let mut milestone = self.load(user_id, milestone_id).await?;
        abandon(&mut milestone, now)?;

        if !self
            .store
            .deactivate_milestone(user_id, milestone_id, now)
            .await?
        {
            return Err(ProgressError::AlreadyAchievedOrInactive { milestone_id });
        }

        info!(%user_id, %milestone_id, "Milestone abandoned");
        Ok(milestone)
    }

    /// Counts across all of the user's milestones
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn milestone_summary(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<MilestoneSummary> {
        let milestones = self.store.list_milestones(user_id).await?;
        Ok(summarize_milestones(
            &milestones,
            civil_date(now, self.offset),
            self.upcoming_days,
        ))
    }

    /// Progress of every open milestone, highest priority first, then nearest deadline
    ///
    /// Milestones with an unusable target are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on collaborator failure
    pub async fn active_progress(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<Vec<MilestoneProgress>> {
        let mut milestones: Vec<Milestone> = self
            .store
            .list_milestones(user_id)
            .await?
            .into_iter()
            .filter(Milestone::can_be_achieved)
            .collect();
        milestones.sort_by_key(|m| (Reverse(m.priority), m.target_date.is_none(), m.target_date));

        let today = civil_date(now, self.offset);
        Ok(milestones
            .iter()
            .filter_map(|m| progress(m, today).ok())
            .collect())
    }
}
