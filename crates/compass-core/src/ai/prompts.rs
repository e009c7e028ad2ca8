//! Prompt and response-schema construction per wizard step.

use std::fmt::Write as _;

use serde_json::{json, Map, Value};

use super::{mapping::mappings_for_step, CompletionRequest};
use crate::{
    error::Result,
    models::{step_info, Language, WizardData},
};

pub const SYSTEM_PROMPT: &str = "You are a strategic planning advisor for municipal \
     innovation programmes. You write concise, realistic and measurable content for \
     strategic plans. Every field ending in _en is written in English and every field \
     ending in _ar in Modern Standard Arabic. Answer with a single JSON object that \
     follows the provided schema and nothing else.";

/// What to ask for on each step, keyed like the step table.
const INSTRUCTIONS: &[(&str, &str)] = &[
    ("context", "Write a short description of this strategic plan."),
    (
        "vision",
        "Propose a vision statement, a mission statement and four to six core values.",
    ),
    (
        "stakeholders",
        "Identify the key stakeholders with their type, influence, interest and an \
         engagement strategy for each.",
    ),
    (
        "pestel",
        "Produce a PESTEL analysis with two or three items per factor, each rated by impact.",
    ),
    (
        "swot",
        "Produce a SWOT analysis with three to five items per quadrant, each rated by impact.",
    ),
    (
        "risks",
        "List the main risks with category, likelihood, impact, a mitigation and an owner.",
    ),
    ("dependencies", "List the external and internal dependencies of the plan."),
    ("constraints", "List the constraints and the planning assumptions."),
    (
        "objectives",
        "Propose three to six strategic objectives with sector, priority and target year.",
    ),
    (
        "kpis",
        "Propose key performance indicators for the objectives with unit, baseline, target, \
         measurement frequency and data source.",
    ),
    (
        "action_plans",
        "Propose action plans with owner, budget and start and end dates (YYYY-MM-DD).",
    ),
    (
        "timeline",
        "Propose delivery phases and milestones with dates (YYYY-MM-DD) and deliverables.",
    ),
    (
        "committees",
        "Propose the governance committees with chair, members, meeting frequency and \
         responsibilities.",
    ),
    (
        "roles",
        "Define the key roles with responsibilities and authority level, and an escalation \
         path ordered from level 1 upwards.",
    ),
    (
        "raci",
        "Build a RACI matrix for the main activities of the plan.",
    ),
    (
        "monitoring",
        "Propose monitoring dashboards with audience, refresh frequency and metrics.",
    ),
    (
        "communication",
        "Propose a communication plan (key messages, channels, audiences) and a change \
         management approach (readiness, training needs, resistance strategies).",
    ),
];

fn instruction_for(key: &str) -> Option<&'static str> {
    INSTRUCTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}

/// Builds the object schema for a step's response, or `None` when the step
/// offers no generation.
///
/// Each property carries the schema of the wizard field it maps to; nested
/// definitions are hoisted into a shared `$defs`.
pub fn response_schema(step: u8) -> Result<Option<Value>> {
    let mappings = mappings_for_step(step);
    if mappings.is_empty() {
        return Ok(None);
    }

    let mut properties = Map::new();
    let mut defs = Map::new();
    for mapping in mappings {
        let Some(schema) = WizardData::field_schema(mapping.field) else {
            continue;
        };
        let mut value = serde_json::to_value(&schema)?;
        if let Value::Object(ref mut object) = value {
            object.remove("$schema");
            object.remove("title");
            if let Some(Value::Object(nested)) = object.remove("$defs") {
                defs.extend(nested);
            }
        }
        properties.insert(mapping.response_key.to_string(), value);
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
        "required": mappings.iter().map(|m| m.response_key).collect::<Vec<_>>(),
    });
    if !defs.is_empty() {
        schema["$defs"] = Value::Object(defs);
    }
    Ok(Some(schema))
}

/// Summary of the plan so far, so suggestions stay consistent with it.
fn plan_context(data: &WizardData) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        if !value.trim().is_empty() {
            let _ = writeln!(out, "{label}: {}", value.trim());
        }
    };

    line("Plan name", &data.name_en);
    line("Plan name (Arabic)", &data.name_ar);
    line("Description", &data.description_en);
    if let (Some(start), Some(end)) = (data.start_year, data.end_year) {
        line("Horizon", &format!("{start}-{end}"));
    }
    line("Vision", &data.vision_en);
    line("Mission", &data.mission_en);

    let objectives: Vec<&str> = data
        .objectives
        .iter()
        .map(|o| o.name_en.as_str())
        .filter(|n| !n.trim().is_empty())
        .collect();
    if !objectives.is_empty() {
        line("Objectives", &objectives.join("; "));
    }
    let phases: Vec<&str> = data
        .phases
        .iter()
        .map(|p| p.name_en.as_str())
        .filter(|n| !n.trim().is_empty())
        .collect();
    if !phases.is_empty() {
        line("Phases", &phases.join("; "));
    }

    out
}

/// Builds the completion request for a step, or `None` when the step offers
/// no generation.
pub fn prompt_for_step(
    step: u8,
    data: &WizardData,
    language: Language,
) -> Result<Option<CompletionRequest>> {
    let info = step_info(step)?;
    let Some(instruction) = instruction_for(info.key) else {
        return Ok(None);
    };
    let Some(schema) = response_schema(step)? else {
        return Ok(None);
    };

    let mut prompt = format!("Step {}: {}\n{instruction}\n", info.number, info.title);
    let context = plan_context(data);
    if !context.is_empty() {
        prompt.push_str("\nCurrent plan:\n");
        prompt.push_str(&context);
    }
    let _ = write!(
        prompt,
        "\nThe author reads {} first; make that text the most polished.",
        language.english_name()
    );

    Ok(Some(CompletionRequest {
        prompt,
        system_prompt: SYSTEM_PROMPT.to_string(),
        response_json_schema: schema,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Objective, STEPS};

    #[test]
    fn every_generating_step_has_instruction_and_schema() {
        for step in STEPS.iter().filter(|s| s.key != "review") {
            assert!(instruction_for(step.key).is_some(), "{}", step.key);
            let schema = response_schema(step.number).unwrap().unwrap();
            assert_eq!(schema["type"], "object");
        }
        assert!(response_schema(18).unwrap().is_none());
    }

    #[test]
    fn schema_uses_response_keys_and_hoists_definitions() {
        let schema = response_schema(15).unwrap().unwrap();
        assert!(schema["properties"].get("raci_matrix").is_some());
        assert_eq!(schema["required"][0], "raci_matrix");
        assert!(schema["$defs"].get("RaciEntry").is_some());
        assert!(schema["properties"]["raci_matrix"].get("$defs").is_none());
    }

    #[test]
    fn item_ids_are_not_requested() {
        let schema = response_schema(9).unwrap().unwrap();
        let objective = &schema["$defs"]["Objective"]["properties"];
        assert!(objective.get("name_en").is_some());
        assert!(objective.get("id").is_none());
    }

    #[test]
    fn prompt_carries_plan_context() {
        let data = WizardData {
            name_en: "Riyadh Smart Services".to_string(),
            vision_en: "Seamless services".to_string(),
            objectives: vec![Objective {
                name_en: "Digitize permits".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let request = prompt_for_step(10, &data, Language::Ar).unwrap().unwrap();
        assert!(request.prompt.contains("Riyadh Smart Services"));
        assert!(request.prompt.contains("Digitize permits"));
        assert!(request.prompt.contains("Arabic"));
        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
        assert!(prompt_for_step(18, &data, Language::En).unwrap().is_none());
    }
}
