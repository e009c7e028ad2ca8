//! The aggregate record edited by the wizard and its partial update.
//!
//! [`WizardData`] and [`WizardUpdate`] are generated from one field list so
//! they cannot drift apart: the update carries one `Option` slot per
//! top-level key of the data, and merging replaces exactly the keys that are
//! present.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::items::{
    ActionPlan, Assumption, ChangeManagement, Committee, CommunicationPlan, Constraint, CoreValue,
    Dashboard, Dependency, EscalationStep, Kpi, Milestone, Objective, Pestel, Phase, RaciEntry,
    Risk, Role, Stakeholder, Swot,
};
use crate::error::Result;

macro_rules! wizard_fields {
    ($( $(#[$meta:meta])* $field:ident : $ty:ty ),+ $(,)?) => {
        /// Every field collected across the wizard steps.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(from = "RawWizardData")]
        pub struct WizardData {
            $( $(#[$meta])* pub $field: $ty, )+
        }

        /// Stored form of [`WizardData`], which may still carry the
        /// deprecated `name` key.
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct RawWizardData {
            $( $field: $ty, )+
            name: Option<String>,
        }

        impl From<RawWizardData> for WizardData {
            fn from(raw: RawWizardData) -> Self {
                let mut data = WizardData {
                    $( $field: raw.$field, )+
                };
                if let Some(legacy) = raw.name {
                    if data.name_en.trim().is_empty() && !legacy.trim().is_empty() {
                        data.name_en = legacy;
                    }
                }
                data
            }
        }

        /// Partial update of [`WizardData`]; absent keys are left untouched.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct WizardUpdate {
            $(
                #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
                pub $field: Option<$ty>,
            )+
        }

        impl WizardData {
            /// Names of all top-level keys, in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Replaces every key present in `update` (last write wins per key).
            pub fn apply(&mut self, update: WizardUpdate) {
                $(
                    if let Some(value) = update.$field {
                        self.$field = value;
                    }
                )+
            }

            /// Builds an update that overwrites every key with this record's value.
            pub fn to_full_update(&self) -> WizardUpdate {
                WizardUpdate {
                    $( $field: Some(self.$field.clone()), )+
                }
            }

            /// Returns the JSON value of a single top-level key.
            pub fn field_value(&self, key: &str) -> Result<Option<Value>> {
                $(
                    if key == stringify!($field) {
                        return Ok(Some(serde_json::to_value(&self.$field)?));
                    }
                )+
                Ok(None)
            }

            /// JSON schema of a single top-level key's type.
            pub fn field_schema(key: &str) -> Option<schemars::Schema> {
                $(
                    if key == stringify!($field) {
                        return Some(schemars::schema_for!($ty));
                    }
                )+
                None
            }
        }

        impl WizardUpdate {
            /// Sets the slot named `key` from a JSON value.
            ///
            /// Returns `Ok(false)` when no such key exists and an error when
            /// the value does not fit the key's type.
            pub fn set_json(&mut self, key: &str, value: Value) -> Result<bool> {
                $(
                    if key == stringify!($field) {
                        self.$field = Some(serde_json::from_value(value)?);
                        return Ok(true);
                    }
                )+
                Ok(false)
            }

            /// Keys carried by this update.
            pub fn keys(&self) -> Vec<&'static str> {
                let mut keys = Vec::new();
                $(
                    if self.$field.is_some() {
                        keys.push(stringify!($field));
                    }
                )+
                keys
            }

            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }
    };
}

/// A key that is present is always `Some`, even when its value is `null`,
/// so an update can clear an optional field.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

wizard_fields! {
    // Context
    name_en: String,
    name_ar: String,
    description_en: String,
    description_ar: String,
    start_year: Option<u16>,
    end_year: Option<u16>,
    // Vision
    vision_en: String,
    vision_ar: String,
    mission_en: String,
    mission_ar: String,
    core_values: Vec<CoreValue>,
    // Analysis
    stakeholders: Vec<Stakeholder>,
    pestel: Pestel,
    swot: Swot,
    risks: Vec<Risk>,
    dependencies: Vec<Dependency>,
    constraints: Vec<Constraint>,
    assumptions: Vec<Assumption>,
    // Strategy
    objectives: Vec<Objective>,
    kpis: Vec<Kpi>,
    action_plans: Vec<ActionPlan>,
    phases: Vec<Phase>,
    milestones: Vec<Milestone>,
    // Governance
    committees: Vec<Committee>,
    roles: Vec<Role>,
    escalation_steps: Vec<EscalationStep>,
    raci_entries: Vec<RaciEntry>,
    dashboards: Vec<Dashboard>,
    // Rollout
    communication_plan: CommunicationPlan,
    change_management: ChangeManagement,
}

impl WizardData {
    /// Parses stored or template JSON; the deprecated `name` key fills an
    /// empty `name_en`.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns a copy with `update` merged in.
    pub fn merged(&self, update: WizardUpdate) -> Self {
        let mut next = self.clone();
        next.apply(update);
        next
    }

    /// Plan name for list views; falls back to a placeholder when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name_en.trim().is_empty() {
            "Untitled plan"
        } else {
            &self.name_en
        }
    }
}

impl WizardUpdate {
    /// Builds an update from a JSON object.
    ///
    /// Unknown keys are ignored; the legacy `name` key fills `name_en` unless
    /// the object also carries `name_en`.
    pub fn from_json(value: Value) -> Result<Self> {
        let mut update = WizardUpdate::default();
        let Value::Object(map) = value else {
            return Err(crate::error::CompassError::invalid_input("update")
                .with_reason("expected a JSON object"));
        };
        let has_name_en = map.contains_key("name_en");
        for (key, value) in map {
            if key == "name" {
                if !has_name_en {
                    update.set_json("name_en", value)?;
                }
                continue;
            }
            if !update.set_json(&key, value)? {
                log::debug!("Ignoring unknown wizard key '{key}'");
            }
        }
        Ok(update)
    }
}
