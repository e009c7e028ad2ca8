//! Mapping of AI response keys onto wizard fields.

use serde_json::Value;

use crate::{
    models::{step_info, WizardUpdate},
    validation::has_content,
};

/// One response key and the wizard field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub response_key: &'static str,
    pub field: &'static str,
}

const fn map(response_key: &'static str, field: &'static str) -> FieldMapping {
    FieldMapping {
        response_key,
        field,
    }
}

/// Response keys accepted per step key. Steps absent here offer no generation.
pub static FIELD_MAPPINGS: &[(&str, &[FieldMapping])] = &[
    (
        "context",
        &[map("description_en", "description_en"), map("description_ar", "description_ar")],
    ),
    (
        "vision",
        &[
            map("vision_en", "vision_en"),
            map("vision_ar", "vision_ar"),
            map("mission_en", "mission_en"),
            map("mission_ar", "mission_ar"),
            map("core_values", "core_values"),
        ],
    ),
    ("stakeholders", &[map("stakeholders", "stakeholders")]),
    ("pestel", &[map("pestel", "pestel")]),
    ("swot", &[map("swot", "swot")]),
    ("risks", &[map("risks", "risks")]),
    ("dependencies", &[map("dependencies", "dependencies")]),
    (
        "constraints",
        &[map("constraints", "constraints"), map("assumptions", "assumptions")],
    ),
    ("objectives", &[map("objectives", "objectives")]),
    ("kpis", &[map("kpis", "kpis")]),
    ("action_plans", &[map("action_plans", "action_plans")]),
    ("timeline", &[map("phases", "phases"), map("milestones", "milestones")]),
    ("committees", &[map("committees", "committees")]),
    (
        "roles",
        &[map("roles", "roles"), map("escalation_path", "escalation_steps")],
    ),
    ("raci", &[map("raci_matrix", "raci_entries")]),
    ("monitoring", &[map("dashboards", "dashboards")]),
    (
        "communication",
        &[
            map("communication_plan", "communication_plan"),
            map("change_management", "change_management"),
        ],
    ),
];

/// Mappings for a step number; empty when the step offers no generation.
pub fn mappings_for_step(step: u8) -> &'static [FieldMapping] {
    let Ok(info) = step_info(step) else {
        return &[];
    };
    FIELD_MAPPINGS
        .iter()
        .find(|(key, _)| *key == info.key)
        .map(|(_, mappings)| *mappings)
        .unwrap_or(&[])
}

/// Outcome of mapping one AI response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedResponse {
    pub update: WizardUpdate,
    /// Wizard fields filled from the response
    pub applied: Vec<&'static str>,
    /// Wizard fields left at their previous value
    pub skipped: Vec<&'static str>,
}

/// Folds a response object into an update for the step's fields.
///
/// Missing, blank or ill-typed values are skipped and the field keeps its
/// previous value. Never fails.
pub fn map_response(step: u8, data: &Value) -> MappedResponse {
    let mut mapped = MappedResponse::default();

    for mapping in mappings_for_step(step) {
        let Some(value) = data.get(mapping.response_key).filter(|v| has_content(v)) else {
            mapped.skipped.push(mapping.field);
            continue;
        };
        match mapped.update.set_json(mapping.field, value.clone()) {
            Ok(true) => mapped.applied.push(mapping.field),
            Ok(false) => mapped.skipped.push(mapping.field),
            Err(e) => {
                log::debug!("Skipping AI value for '{}': {e}", mapping.response_key);
                mapped.skipped.push(mapping.field);
            }
        }
    }

    mapped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{WizardData, STEPS};

    #[test]
    fn every_mapped_field_exists_and_belongs_to_its_step() {
        for (key, mappings) in FIELD_MAPPINGS {
            let step = STEPS.iter().find(|s| s.key == *key).unwrap();
            for mapping in *mappings {
                assert!(
                    WizardData::FIELD_NAMES.contains(&mapping.field),
                    "{} is not a wizard field",
                    mapping.field
                );
                assert!(step.fields.contains(&mapping.field), "{key}: {}", mapping.field);
            }
        }
    }

    #[test]
    fn missing_and_ill_typed_values_keep_previous() {
        let mapped = map_response(
            2,
            &json!({
                "vision_en": "A leading smart municipality",
                "mission_en": "",
                "core_values": "not a list"
            }),
        );
        assert_eq!(mapped.applied, vec!["vision_en"]);
        assert_eq!(
            mapped.skipped,
            vec!["vision_ar", "mission_en", "mission_ar", "core_values"]
        );

        let previous = WizardData {
            mission_en: "Serve residents".to_string(),
            ..Default::default()
        };
        let merged = previous.merged(mapped.update);
        assert_eq!(merged.vision_en, "A leading smart municipality");
        assert_eq!(merged.mission_en, "Serve residents");
    }

    #[test]
    fn renamed_keys_reach_their_fields() {
        let mapped = map_response(
            15,
            &json!({"raci_matrix": [{"activity": "Approve budget", "accountable": "Mayor"}]}),
        );
        let entries = mapped.update.raci_entries.unwrap();
        assert_eq!(entries[0].activity, "Approve budget");
        assert_eq!(entries[0].accountable, "Mayor");
    }

    #[test]
    fn review_step_and_non_objects_map_nothing() {
        assert!(mappings_for_step(18).is_empty());
        assert!(map_response(18, &json!({"vision_en": "x"})).update.is_empty());
        let mapped = map_response(9, &json!(["not", "an", "object"]));
        assert!(mapped.update.is_empty());
        assert_eq!(mapped.skipped, vec!["objectives"]);
    }
}
