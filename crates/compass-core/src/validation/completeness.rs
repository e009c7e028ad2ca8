//! Deterministic completeness scoring.
//!
//! Scores are pure functions of which fields are populated. The four hard
//! submission requirements together weigh exactly
//! [`SUBMISSION_THRESHOLD`](super::SUBMISSION_THRESHOLD) points, so a plan
//! meeting only those sits on the threshold.

use serde_json::Value;

use crate::models::{step_info, WizardData, LAST_STEP};

/// One weighted completeness rule.
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    pub label: &'static str,
    pub weight: u8,
    pub met: fn(&WizardData) -> bool,
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Weighted rules; weights sum to 100.
pub static CRITERIA: [Criterion; 12] = [
    Criterion {
        label: "Plan name",
        weight: 15,
        met: |d| filled(&d.name_en),
    },
    Criterion {
        label: "Vision statement",
        weight: 15,
        met: |d| filled(&d.vision_en),
    },
    Criterion {
        label: "At least 3 objectives",
        weight: 20,
        met: |d| d.objectives.len() >= 3,
    },
    Criterion {
        label: "At least 1 KPI",
        weight: 10,
        met: |d| !d.kpis.is_empty(),
    },
    Criterion {
        label: "Plan description",
        weight: 5,
        met: |d| filled(&d.description_en),
    },
    Criterion {
        label: "Mission statement",
        weight: 5,
        met: |d| filled(&d.mission_en),
    },
    Criterion {
        label: "Stakeholders",
        weight: 5,
        met: |d| !d.stakeholders.is_empty(),
    },
    Criterion {
        label: "SWOT analysis",
        weight: 5,
        met: |d| !d.swot.is_empty(),
    },
    Criterion {
        label: "PESTEL analysis",
        weight: 5,
        met: |d| !d.pestel.is_empty(),
    },
    Criterion {
        label: "Risks",
        weight: 5,
        met: |d| !d.risks.is_empty(),
    },
    Criterion {
        label: "Timeline",
        weight: 5,
        met: |d| !d.phases.is_empty() || !d.milestones.is_empty(),
    },
    Criterion {
        label: "Governance",
        weight: 5,
        met: |d| !d.committees.is_empty() || !d.raci_entries.is_empty(),
    },
];

/// Overall completeness, 0..=100.
pub fn calculate_progress(data: &WizardData) -> u8 {
    CRITERIA
        .iter()
        .filter(|c| (c.met)(data))
        .map(|c| c.weight)
        .sum::<u8>()
        .min(100)
}

/// Every rule with whether it is met, for the review step.
pub fn progress_breakdown(data: &WizardData) -> Vec<(&'static Criterion, bool)> {
    CRITERIA.iter().map(|c| (c, (c.met)(data))).collect()
}

/// Whether a JSON value carries any user content.
pub(crate) fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => filled(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(has_content),
    }
}

/// Share of a step's fields that are populated, 0..=100.
///
/// The review step reports overall progress. Out-of-range steps score 0.
pub fn step_completeness(step: u8, data: &WizardData) -> u8 {
    if step == LAST_STEP {
        return calculate_progress(data);
    }
    let Ok(info) = step_info(step) else {
        return 0;
    };
    if info.fields.is_empty() {
        return 100;
    }

    let populated = info
        .fields
        .iter()
        .filter(|key| {
            data.field_value(key)
                .ok()
                .flatten()
                .is_some_and(|value| has_content(&value))
        })
        .count();

    ((populated * 100) / info.fields.len()) as u8
}
