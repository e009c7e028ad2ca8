//! Parameter structures for plan store operations.
//!
//! These structures are shared by every interface (wizard, CLI) and carry no
//! framework-specific derives. Interface layers wrap them (for example with
//! clap `Args` structs) and convert with `From`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   PlanBackend   │
//! │  (clap derives) │───▶│ (minimal deps)  │───▶│  (SQLite, ...)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{ApprovalStatus, PlanStatus, WizardData, WizardUpdate};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the plan to operate on
    pub id: u64,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Case-insensitive substring of the plan name
    pub name_contains: Option<String>,
    /// List templates instead of plans
    #[serde(default)]
    pub templates: bool,
    /// Only plans shared publicly
    #[serde(default)]
    pub public_only: bool,
    pub status: Option<PlanStatus>,
    /// Restrict to one owner
    pub owner: Option<String>,
    /// List the recycle bin (soft-deleted plans)
    #[serde(default)]
    pub deleted: bool,
}

/// Parameters for inserting a new plan record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    pub owner_id: Option<String>,
    pub data: WizardData,
    pub draft_data: Option<WizardUpdate>,
    pub last_saved_step: u8,
    pub status: PlanStatus,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_public: bool,
    /// Stamp `submitted_at` with the creation time
    #[serde(default)]
    pub submitted: bool,
}

/// Parameters for updating an existing plan by id.
///
/// `None` leaves a column untouched. `draft_data: Some(None)` clears the draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub id: u64,
    pub data: Option<WizardData>,
    pub draft_data: Option<Option<WizardUpdate>>,
    pub last_saved_step: Option<u8>,
    pub status: Option<PlanStatus>,
    pub approval_status: Option<ApprovalStatus>,
    /// Increment `version_number` as part of this write
    #[serde(default)]
    pub bump_version: bool,
    /// Stamp `submitted_at` with the write time
    #[serde(default)]
    pub mark_submitted: bool,
}
