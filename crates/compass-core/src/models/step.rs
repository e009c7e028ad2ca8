//! The fixed, ordered list of wizard steps.

use serde::Serialize;

use crate::error::{CompassError, Result};

/// Number of the first wizard step.
pub const FIRST_STEP: u8 = 1;

/// Number of the last wizard step (review & submit).
pub const LAST_STEP: u8 = 18;

/// Presentational metadata for one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// 1-based position in the wizard
    pub number: u8,
    /// Stable key used by prompts and field mappings
    pub key: &'static str,
    pub title: &'static str,
    /// Icon name understood by the front end
    pub icon: &'static str,
    /// Top-level [`WizardData`](super::WizardData) keys edited on this step
    pub fields: &'static [&'static str],
}

/// All steps in wizard order.
pub const STEPS: [StepInfo; LAST_STEP as usize] = [
    StepInfo {
        number: 1,
        key: "context",
        title: "Plan Context",
        icon: "file-text",
        fields: &["name_en", "name_ar", "description_en", "description_ar", "start_year", "end_year"],
    },
    StepInfo {
        number: 2,
        key: "vision",
        title: "Vision & Mission",
        icon: "eye",
        fields: &["vision_en", "vision_ar", "mission_en", "mission_ar", "core_values"],
    },
    StepInfo {
        number: 3,
        key: "stakeholders",
        title: "Stakeholders",
        icon: "users",
        fields: &["stakeholders"],
    },
    StepInfo {
        number: 4,
        key: "pestel",
        title: "PESTEL Analysis",
        icon: "globe",
        fields: &["pestel"],
    },
    StepInfo {
        number: 5,
        key: "swot",
        title: "SWOT Analysis",
        icon: "grid",
        fields: &["swot"],
    },
    StepInfo {
        number: 6,
        key: "risks",
        title: "Risk Assessment",
        icon: "shield-alert",
        fields: &["risks"],
    },
    StepInfo {
        number: 7,
        key: "dependencies",
        title: "Dependencies",
        icon: "git-branch",
        fields: &["dependencies"],
    },
    StepInfo {
        number: 8,
        key: "constraints",
        title: "Constraints & Assumptions",
        icon: "lock",
        fields: &["constraints", "assumptions"],
    },
    StepInfo {
        number: 9,
        key: "objectives",
        title: "Strategic Objectives",
        icon: "target",
        fields: &["objectives"],
    },
    StepInfo {
        number: 10,
        key: "kpis",
        title: "Key Performance Indicators",
        icon: "bar-chart",
        fields: &["kpis"],
    },
    StepInfo {
        number: 11,
        key: "action_plans",
        title: "Action Plans",
        icon: "list-checks",
        fields: &["action_plans"],
    },
    StepInfo {
        number: 12,
        key: "timeline",
        title: "Timeline & Phases",
        icon: "calendar",
        fields: &["phases", "milestones"],
    },
    StepInfo {
        number: 13,
        key: "committees",
        title: "Governance Committees",
        icon: "landmark",
        fields: &["committees"],
    },
    StepInfo {
        number: 14,
        key: "roles",
        title: "Roles & Escalation",
        icon: "user-cog",
        fields: &["roles", "escalation_steps"],
    },
    StepInfo {
        number: 15,
        key: "raci",
        title: "RACI Matrix",
        icon: "table",
        fields: &["raci_entries"],
    },
    StepInfo {
        number: 16,
        key: "monitoring",
        title: "Monitoring Dashboards",
        icon: "layout-dashboard",
        fields: &["dashboards"],
    },
    StepInfo {
        number: 17,
        key: "communication",
        title: "Communication & Change",
        icon: "megaphone",
        fields: &["communication_plan", "change_management"],
    },
    StepInfo {
        number: 18,
        key: "review",
        title: "Review & Submit",
        icon: "check-circle",
        fields: &[],
    },
];

/// Looks up a step by number.
pub fn step_info(number: u8) -> Result<&'static StepInfo> {
    if !(FIRST_STEP..=LAST_STEP).contains(&number) {
        return Err(CompassError::invalid_input("step")
            .with_reason(format!("must be between {FIRST_STEP} and {LAST_STEP}, got {number}")));
    }
    Ok(&STEPS[usize::from(number - 1)])
}

/// Looks up a step by key.
pub fn step_by_key(key: &str) -> Option<&'static StepInfo> {
    STEPS.iter().find(|step| step.key == key)
}
