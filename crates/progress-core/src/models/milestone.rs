// ABOUTME: User goals tracked toward a target value and an optional deadline
// ABOUTME: Achievement is a one-way transition; abandonment only clears the active flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined goal
///
/// `achieved_at` is `Some` exactly when `is_achieved` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Free-form type tag, e.g. `weight_target` or `workout_count`
    pub milestone_type: String,
    /// Value that counts as 100%
    pub target_value: f64,
    /// Latest progress value, updated as progress accrues
    pub current_value: f64,
    /// Optional deadline
    pub target_date: Option<NaiveDate>,
    /// Whether the goal was reached
    pub is_achieved: bool,
    /// When the goal was reached
    pub achieved_at: Option<DateTime<Utc>>,
    /// Grouping label
    pub category: Option<String>,
    /// Higher sorts first
    pub priority: i32,
    /// False once abandoned
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// Still being worked on
    Active,
    /// Reached
    Achieved,
    /// Deactivated without being reached
    Abandoned,
}

impl Milestone {
    /// Build an active, unachieved milestone from a creation request
    #[must_use]
    pub fn from_request(user_id: Uuid, request: NewMilestone, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: request.title,
            description: request.description,
            milestone_type: request.milestone_type,
            target_value: request.target_value,
            current_value: request.current_value,
            target_date: request.target_date,
            is_achieved: false,
            achieved_at: None,
            category: request.category,
            priority: request.priority,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn status(&self) -> MilestoneStatus {
        if self.is_achieved {
            MilestoneStatus::Achieved
        } else if self.is_active {
            MilestoneStatus::Active
        } else {
            MilestoneStatus::Abandoned
        }
    }

    /// Whether `achieve` is currently legal
    #[must_use]
    pub const fn can_be_achieved(&self) -> bool {
        self.is_active && !self.is_achieved
    }
}

/// Creation payload for a milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMilestone {
    /// Short title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Free-form type tag
    pub milestone_type: String,
    /// Value that counts as 100%
    pub target_value: f64,
    /// Starting progress value
    #[serde(default)]
    pub current_value: f64,
    /// Optional deadline
    pub target_date: Option<NaiveDate>,
    /// Grouping label
    pub category: Option<String>,
    /// Higher sorts first
    #[serde(default)]
    pub priority: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewMilestone {
        NewMilestone {
            title: "Run 100 km".into(),
            description: None,
            milestone_type: "distance".into(),
            target_value: 100.0,
            current_value: 0.0,
            target_date: None,
            category: None,
            priority: 0,
        }
    }

    #[test]
    fn test_new_milestone_starts_active() {
        let milestone = Milestone::from_request(Uuid::new_v4(), request(), Utc::now());
        assert_eq!(milestone.status(), MilestoneStatus::Active);
        assert!(milestone.can_be_achieved());
        assert!(milestone.achieved_at.is_none());
    }

    #[test]
    fn test_inactive_unachieved_is_abandoned() {
        let mut milestone = Milestone::from_request(Uuid::new_v4(), request(), Utc::now());
        milestone.is_active = false;
        assert_eq!(milestone.status(), MilestoneStatus::Abandoned);
        assert!(!milestone.can_be_achieved());
    }
}
