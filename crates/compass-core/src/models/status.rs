//! Status enumerations for plans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a persisted plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Saved but not yet submitted
    #[default]
    Draft,

    /// Submitted and in force
    Active,

    /// All actions delivered
    Completed,

    /// Hidden from normal views
    Archived,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            "archived" => Ok(PlanStatus::Archived),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
            PlanStatus::Archived => "archived",
        }
    }
}

/// Approval workflow status of a persisted plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ApprovalStatus::Draft),
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {s}")),
        }
    }
}

impl ApprovalStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Draft => "draft",
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Get status with a consistent icon for display.
    ///
    /// ```rust
    /// use compass_core::models::ApprovalStatus;
    ///
    /// assert_eq!(ApprovalStatus::Approved.with_icon(), "✓ Approved");
    /// assert_eq!(ApprovalStatus::Pending.with_icon(), "➤ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ApprovalStatus::Draft => "○ Draft",
            ApprovalStatus::Pending => "➤ Pending",
            ApprovalStatus::Approved => "✓ Approved",
            ApprovalStatus::Rejected => "✗ Rejected",
        }
    }
}
