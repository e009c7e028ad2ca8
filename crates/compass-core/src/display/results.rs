//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{Plan, SaveReceipt, WizardData},
    validation::{calculate_progress, progress_breakdown, SUBMISSION_THRESHOLD},
};

/// Outcome of creating a plan, followed by the plan itself.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Outcome of editing a plan, with the keys that changed.
///
/// ```rust
/// use compass_core::display::UpdateResult;
///
/// let result = UpdateResult::with_changes(7_u64, vec!["vision_en".to_string()]);
/// assert_eq!(result.changes.len(), 1);
/// ```
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated plan with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Outcome of submitting a plan for approval.
pub struct SubmitResult(pub Plan);

impl fmt::Display for SubmitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Submitted plan {} for approval (version {})",
            self.0.id, self.0.version_number
        )?;
        writeln!(f)?;
        write!(f, "{}", self.0)
    }
}

/// Outcome of an explicit draft save.
pub struct SaveResult(pub SaveReceipt);

impl fmt::Display for SaveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Saved draft of plan {} (version {}) at {}",
            self.0.plan_id,
            self.0.version_number,
            LocalDateTime(&self.0.updated_at)
        )
    }
}

/// Outcome of moving a plan to or from the recycle bin.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted plan '{}' (ID: {}); restore it with `compass plan restore {}`",
            self.resource.title(),
            self.resource.id,
            self.resource.id
        )
    }
}

pub struct RestoreResult(pub Plan);

impl fmt::Display for RestoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Restored plan '{}' (ID: {})", self.0.title(), self.0.id)
    }
}

/// Weighted completeness breakdown shown on the review step.
pub struct ProgressReport<'a>(pub &'a WizardData);

impl fmt::Display for ProgressReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = calculate_progress(self.0);
        writeln!(f, "# Completeness: {progress}%")?;
        writeln!(f)?;
        for (criterion, met) in progress_breakdown(self.0) {
            writeln!(
                f,
                "- {} {} ({}%)",
                if met { "✓" } else { "○" },
                criterion.label,
                criterion.weight
            )?;
        }
        writeln!(f)?;
        if progress >= SUBMISSION_THRESHOLD {
            writeln!(f, "Ready for submission once the required items are met.")
        } else {
            writeln!(
                f,
                "{}% more needed before submission ({}% required).",
                SUBMISSION_THRESHOLD - progress,
                SUBMISSION_THRESHOLD
            )
        }
    }
}
