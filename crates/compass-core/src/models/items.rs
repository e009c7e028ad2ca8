//! Item records held in the list-valued fields of [`WizardData`].
//!
//! Every record derives `Default` and is deserialized with `#[serde(default)]`
//! so partially filled rows (from older drafts or AI output) still load. A row
//! arriving without an `id` is assigned a fresh one.
//!
//! [`WizardData`]: super::WizardData

use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ItemId;

/// Three-point rating used for influence, interest, likelihood, impact, etc.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl Level {
    /// Numeric weight (1..=3) used for risk scoring.
    pub fn weight(self) -> u8 {
        match self {
            Level::Low => 1,
            Level::Medium => 2,
            Level::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CoreValue {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub name_ar: String,
    pub description_en: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Stakeholder {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub name_ar: String,
    /// Free-form category (government, private sector, community, ...)
    pub stakeholder_type: String,
    pub influence: Level,
    pub interest: Level,
    pub engagement_strategy: String,
}

/// One bullet of a SWOT quadrant or PESTEL factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisItem {
    #[schemars(skip)]
    pub id: ItemId,
    pub text_en: String,
    pub text_ar: String,
    pub impact: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Swot {
    pub strengths: Vec<AnalysisItem>,
    pub weaknesses: Vec<AnalysisItem>,
    pub opportunities: Vec<AnalysisItem>,
    pub threats: Vec<AnalysisItem>,
}

impl Swot {
    /// Number of populated quadrants (0..=4).
    pub fn filled_quadrants(&self) -> usize {
        [
            &self.strengths,
            &self.weaknesses,
            &self.opportunities,
            &self.threats,
        ]
        .iter()
        .filter(|q| !q.is_empty())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_quadrants() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Pestel {
    pub political: Vec<AnalysisItem>,
    pub economic: Vec<AnalysisItem>,
    pub social: Vec<AnalysisItem>,
    pub technological: Vec<AnalysisItem>,
    pub environmental: Vec<AnalysisItem>,
    pub legal: Vec<AnalysisItem>,
}

impl Pestel {
    /// Number of populated factors (0..=6).
    pub fn filled_factors(&self) -> usize {
        [
            &self.political,
            &self.economic,
            &self.social,
            &self.technological,
            &self.environmental,
            &self.legal,
        ]
        .iter()
        .filter(|f| !f.is_empty())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_factors() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Risk {
    #[schemars(skip)]
    pub id: ItemId,
    pub title_en: String,
    pub title_ar: String,
    pub category: String,
    pub likelihood: Level,
    pub impact: Level,
    pub mitigation_en: String,
    pub owner: String,
}

impl Risk {
    /// Likelihood times impact, 1..=9.
    pub fn score(&self) -> u8 {
        self.likelihood.weight() * self.impact.weight()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Dependency {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    /// internal, external, technical, regulatory, ...
    pub dependency_type: String,
    pub source: String,
    pub target: String,
    pub criticality: Level,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Constraint {
    #[schemars(skip)]
    pub id: ItemId,
    pub description_en: String,
    pub description_ar: String,
    /// budget, legal, capacity, time, ...
    pub constraint_type: String,
    pub mitigation_en: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Assumption {
    #[schemars(skip)]
    pub id: ItemId,
    pub statement_en: String,
    pub statement_ar: String,
    pub confidence: Level,
    pub validation_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Objective {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub name_ar: String,
    pub description_en: String,
    pub sector: String,
    pub priority: Level,
    pub target_year: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Kpi {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub name_ar: String,
    /// Objective this indicator measures, if linked
    #[schemars(skip)]
    pub objective_id: Option<ItemId>,
    pub unit: String,
    pub baseline: Option<f64>,
    pub target: Option<f64>,
    /// monthly, quarterly, annual, ...
    pub frequency: String,
    pub data_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ActionPlan {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    #[schemars(skip)]
    pub objective_id: Option<ItemId>,
    pub owner: String,
    pub budget: Option<f64>,
    #[schemars(with = "Option<String>")]
    pub start_date: Option<Date>,
    #[schemars(with = "Option<String>")]
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Phase {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub description_en: String,
    #[schemars(with = "Option<String>")]
    pub start_date: Option<Date>,
    #[schemars(with = "Option<String>")]
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Milestone {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    #[schemars(with = "Option<String>")]
    pub date: Option<Date>,
    #[schemars(skip)]
    pub phase_id: Option<ItemId>,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Committee {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub name_ar: String,
    pub chair: String,
    pub members: Vec<String>,
    pub meeting_frequency: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Role {
    #[schemars(skip)]
    pub id: ItemId,
    pub title_en: String,
    pub title_ar: String,
    pub responsibilities: Vec<String>,
    pub authority_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EscalationStep {
    #[schemars(skip)]
    pub id: ItemId,
    pub level: u8,
    pub role: String,
    pub timeframe: String,
    pub criteria: String,
}

/// One row of the decision-rights matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RaciEntry {
    #[schemars(skip)]
    pub id: ItemId,
    pub activity: String,
    pub responsible: String,
    pub accountable: String,
    pub consulted: Vec<String>,
    pub informed: Vec<String>,
}

impl RaciEntry {
    /// A row is usable once it names both a responsible and an accountable party.
    pub fn is_assigned(&self) -> bool {
        !self.responsible.trim().is_empty() && !self.accountable.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Dashboard {
    #[schemars(skip)]
    pub id: ItemId,
    pub name_en: String,
    pub audience: String,
    pub refresh_frequency: String,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CommunicationPlan {
    pub key_messages_en: Vec<String>,
    pub channels: Vec<String>,
    pub audiences: Vec<String>,
}

impl CommunicationPlan {
    pub fn is_empty(&self) -> bool {
        self.key_messages_en.is_empty() && self.channels.is_empty() && self.audiences.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChangeManagement {
    pub readiness: Option<Level>,
    pub training_needs: Vec<String>,
    pub resistance_strategies: Vec<String>,
}

impl ChangeManagement {
    pub fn is_empty(&self) -> bool {
        self.readiness.is_none()
            && self.training_needs.is_empty()
            && self.resistance_strategies.is_empty()
    }
}
