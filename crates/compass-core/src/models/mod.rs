//! Data models for strategic plans and the wizard that edits them.
//!
//! - [`WizardData`] is the aggregate edited across the 18 steps and
//!   [`WizardUpdate`] its partial update.
//! - [`items`] holds the typed list rows (objectives, KPIs, risks, ...),
//!   each carrying a stable [`ItemId`].
//! - [`Plan`] is the persisted record with lifecycle and approval metadata.
//! - [`STEPS`] is the fixed step table.
//!
//! Display implementations live in [`crate::display`].

pub mod filters;
pub mod ids;
pub mod items;
pub mod language;
pub mod plan;
pub mod status;
pub mod step;
pub mod summary;
pub mod wizard_data;

pub use filters::PlanFilter;
pub use ids::ItemId;
pub use items::{
    ActionPlan, AnalysisItem, Assumption, ChangeManagement, Committee, CommunicationPlan,
    Constraint, CoreValue, Dashboard, Dependency, EscalationStep, Kpi, Level, Milestone,
    Objective, Pestel, Phase, RaciEntry, Risk, Role, Stakeholder, Swot,
};
pub use language::Language;
pub use plan::{Plan, SaveReceipt};
pub use status::{ApprovalStatus, PlanStatus};
pub use step::{step_by_key, step_info, StepInfo, FIRST_STEP, LAST_STEP, STEPS};
pub use summary::PlanSummary;
pub use wizard_data::{WizardData, WizardUpdate};
