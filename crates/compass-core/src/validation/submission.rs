//! Final-submission gate used by the review step.

use super::{calculate_progress, ValidationError, ValidationResult};
use crate::models::WizardData;

/// Minimum overall completeness (percent) required to submit.
pub const SUBMISSION_THRESHOLD: u8 = 60;

/// Minimum number of strategic objectives on a submitted plan.
pub const MIN_OBJECTIVES: usize = 3;

/// Minimum number of KPIs on a submitted plan.
pub const MIN_KPIS: usize = 1;

/// Checks the hard requirements and the completeness threshold.
///
/// Independent of per-step soft completeness; lists every violated rule.
pub fn validate_submission(data: &WizardData) -> ValidationResult {
    let mut errors = Vec::new();

    if data.name_en.trim().is_empty() {
        errors.push(ValidationError::new("name_en", "Plan name is required"));
    }
    if data.vision_en.trim().is_empty() {
        errors.push(ValidationError::new("vision_en", "Vision statement is required"));
    }
    if data.objectives.len() < MIN_OBJECTIVES {
        errors.push(ValidationError::new(
            "objectives",
            format!("At least {MIN_OBJECTIVES} objectives required"),
        ));
    }
    if data.kpis.len() < MIN_KPIS {
        errors.push(ValidationError::new(
            "kpis",
            format!("At least {MIN_KPIS} KPI required"),
        ));
    }

    let progress = calculate_progress(data);
    if progress < SUBMISSION_THRESHOLD {
        errors.push(ValidationError::new(
            "progress",
            format!(
                "Plan must be at least {SUBMISSION_THRESHOLD}% complete (currently {progress}%)"
            ),
        ));
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Kpi, Objective};

    fn plan_with(objectives: usize, kpis: usize) -> WizardData {
        WizardData {
            name_en: "Innovation Strategy".to_string(),
            vision_en: "A leading smart city".to_string(),
            objectives: vec![Objective::default(); objectives],
            kpis: vec![Kpi::default(); kpis],
            ..Default::default()
        }
    }

    #[test]
    fn two_objectives_are_rejected() {
        let result = validate_submission(&plan_with(2, 1));
        assert!(!result.is_valid);
        assert!(result
            .messages()
            .contains(&"At least 3 objectives required".to_string()));
    }

    #[test]
    fn three_objectives_and_one_kpi_pass() {
        let result = validate_submission(&plan_with(3, 1));
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn empty_plan_lists_every_rule() {
        let result = validate_submission(&WizardData::default());
        let fields: Vec<_> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name_en", "vision_en", "objectives", "kpis", "progress"]);
    }
}
