//! Plan summary used by list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, Plan, PlanStatus};
use crate::validation::calculate_progress;

/// Summary information about a plan with completeness statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub id: u64,
    pub title: String,
    pub status: PlanStatus,
    pub approval_status: ApprovalStatus,
    pub version_number: u32,
    pub last_saved_step: u8,
    pub is_template: bool,
    pub is_deleted: bool,
    /// Whether unsubmitted draft edits exist
    pub has_draft: bool,
    pub objective_count: usize,
    pub kpi_count: usize,
    /// Completeness of the working copy, 0..=100
    pub progress: u8,
    pub updated_at: Timestamp,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        let working = plan.working_data();
        Self {
            id: plan.id,
            title: working.display_name().to_string(),
            status: plan.status,
            approval_status: plan.approval_status,
            version_number: plan.version_number,
            last_saved_step: plan.last_saved_step,
            is_template: plan.is_template,
            is_deleted: plan.is_deleted,
            has_draft: plan.draft_data.is_some(),
            objective_count: working.objectives.len(),
            kpi_count: working.kpis.len(),
            progress: calculate_progress(&working),
            updated_at: plan.updated_at,
        }
    }
}
