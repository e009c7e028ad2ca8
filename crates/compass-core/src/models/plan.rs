//! Persisted plan record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, PlanStatus, WizardData, WizardUpdate};

/// A saved or submitted strategic plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Acting user that created the plan, if known
    pub owner_id: Option<String>,

    #[serde(default)]
    pub status: PlanStatus,

    #[serde(default)]
    pub approval_status: ApprovalStatus,

    /// Starts at 1; bumped on every edit-mode commit
    pub version_number: u32,

    /// Step the author was on at the last save (1..=18)
    pub last_saved_step: u8,

    pub is_template: bool,
    pub is_public: bool,

    /// Soft-delete flag; deleted plans are hidden from listings
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,

    /// Committed plan content
    pub data: WizardData,

    /// Unsubmitted edits layered over `data`, key by key
    pub draft_data: Option<WizardUpdate>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
}

impl Plan {
    /// Content the wizard should resume from: the committed data with every
    /// key present in the draft overlaid.
    pub fn working_data(&self) -> WizardData {
        match &self.draft_data {
            Some(draft) => self.data.merged(draft.clone()),
            None => self.data.clone(),
        }
    }

    pub fn title(&self) -> &str {
        self.data.display_name()
    }
}

/// Metadata returned by a backend write; never carries wizard content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub plan_id: u64,
    pub version_number: u32,
    pub updated_at: Timestamp,
}

impl From<&Plan> for SaveReceipt {
    fn from(plan: &Plan) -> Self {
        Self {
            plan_id: plan.id,
            version_number: plan.version_number,
            updated_at: plan.updated_at,
        }
    }
}
