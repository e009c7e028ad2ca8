//! Step validation, completeness scoring and the submission gate.
//!
//! Validation failures are values, not errors: a [`ValidationResult`] lists
//! every violated rule and only blocks the transition that asked for it.

use serde::Serialize;

use crate::models::WizardData;

pub mod completeness;
pub mod submission;

pub(crate) use completeness::has_content;
pub use completeness::{
    calculate_progress, progress_breakdown, step_completeness, Criterion, CRITERIA,
};
pub use submission::{validate_submission, SUBMISSION_THRESHOLD};

/// Highest step whose validation blocks "Next".
pub const LAST_BLOCKING_STEP: u8 = 2;

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Top-level key the rule concerns
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Messages in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the required fields of one step.
///
/// Step 1 needs a plan name and description, step 2 a vision and mission.
/// Every other step is advisory and always valid.
pub fn validate_step(step: u8, data: &WizardData) -> ValidationResult {
    let mut errors = Vec::new();

    match step {
        1 => {
            if is_blank(&data.name_en) {
                errors.push(ValidationError::new("name_en", "Plan name is required"));
            }
            if is_blank(&data.description_en) {
                errors.push(ValidationError::new(
                    "description_en",
                    "Plan description is required",
                ));
            }
        }
        2 => {
            if is_blank(&data.vision_en) {
                errors.push(ValidationError::new("vision_en", "Vision statement is required"));
            }
            if is_blank(&data.mission_en) {
                errors.push(ValidationError::new("mission_en", "Mission statement is required"));
            }
        }
        _ => {}
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_one_requires_name_and_description() {
        let mut data = WizardData::default();
        let result = validate_step(1, &data);
        assert!(!result.is_valid);
        assert_eq!(
            result.messages(),
            vec!["Plan name is required", "Plan description is required"]
        );

        data.name_en = "Smart Riyadh".to_string();
        let result = validate_step(1, &data);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "description_en");

        data.description_en = "Five-year innovation roadmap".to_string();
        assert!(validate_step(1, &data).is_valid);
    }

    #[test]
    fn whitespace_does_not_count_as_content() {
        let data = WizardData {
            name_en: "   ".to_string(),
            description_en: "\n".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_step(1, &data).errors.len(), 2);
    }

    #[test]
    fn step_two_requires_vision_and_mission() {
        let data = WizardData {
            vision_en: "A liveable city".to_string(),
            ..Default::default()
        };
        let result = validate_step(2, &data);
        assert_eq!(result.messages(), vec!["Mission statement is required"]);
    }

    #[test]
    fn later_steps_never_block() {
        let data = WizardData::default();
        for step in 3..=18 {
            assert!(validate_step(step, &data).is_valid, "step {step}");
        }
    }
}
