//! How a wizard session is opened and what it was seeded from.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{CompassError, Result};

/// Editing mode of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardMode {
    /// New plan, possibly seeded from a template or a recovered draft
    #[default]
    Create,
    /// Existing plan; saves go to its draft overlay
    Edit,
    /// Read-only view of an existing plan
    Review,
}

impl WizardMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, WizardMode::Review)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardMode::Create => "create",
            WizardMode::Edit => "edit",
            WizardMode::Review => "review",
        }
    }
}

impl FromStr for WizardMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(WizardMode::Create),
            "edit" => Ok(WizardMode::Edit),
            "review" => Ok(WizardMode::Review),
            _ => Err(format!("Invalid wizard mode: {s}")),
        }
    }
}

/// Parameters a session is launched with.
///
/// A template takes precedence over a plan id. `mode` only matters together
/// with `id`, where `review` opens the plan read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub id: Option<u64>,
    pub mode: Option<WizardMode>,
    pub template: Option<u64>,
}

impl LaunchParams {
    pub fn new_plan() -> Self {
        Self::default()
    }

    pub fn edit(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn review(id: u64) -> Self {
        Self {
            id: Some(id),
            mode: Some(WizardMode::Review),
            template: None,
        }
    }

    pub fn from_template(template: u64) -> Self {
        Self {
            template: Some(template),
            ..Default::default()
        }
    }

    /// Parses `id=12&mode=review&template=3` style query strings.
    ///
    /// Unknown keys are ignored; malformed values are an error.
    pub fn from_query(query: &str) -> Result<Self> {
        let mut params = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "id" => params.id = Some(parse_id("id", value)?),
                "template" => params.template = Some(parse_id("template", value)?),
                "mode" => {
                    params.mode = Some(value.parse().map_err(|e: String| {
                        CompassError::invalid_input("mode").with_reason(e)
                    })?)
                }
                other => log::debug!("Ignoring launch parameter '{other}'"),
            }
        }
        Ok(params)
    }

    /// Mode the session runs in once hydrated.
    pub fn resolved_mode(&self) -> WizardMode {
        match (self.template, self.id, self.mode) {
            (Some(_), _, _) => WizardMode::Create,
            (None, Some(_), Some(WizardMode::Review)) => WizardMode::Review,
            (None, Some(_), _) => WizardMode::Edit,
            (None, None, _) => WizardMode::Create,
        }
    }
}

fn parse_id(field: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| CompassError::invalid_input(field).with_reason(format!("not an id: '{value}'")))
}

/// What the session's data was seeded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Hydration {
    /// Empty plan
    Fresh,
    /// Content copied from a template; saving creates a new plan
    FromTemplate { template_id: u64 },
    /// Existing plan with any draft overlay applied
    FromPlan { plan_id: u64 },
    /// A local draft from an earlier session awaits a recover or discard
    /// decision; the wizard starts empty until then
    RecoveryAvailable {
        saved_at: Timestamp,
        step: u8,
        plan_id: Option<u64>,
    },
    /// The local draft was recovered into this session
    Recovered { plan_id: Option<u64> },
}

impl Hydration {
    pub fn recovery_pending(&self) -> bool {
        matches!(self, Hydration::RecoveryAvailable { .. })
    }
}
