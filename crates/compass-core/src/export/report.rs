//! Printable markdown report of a whole plan.

use std::fmt;

use crate::{
    display::LocalDateTime,
    models::{AnalysisItem, ItemId, Plan, WizardData},
    validation::{calculate_progress, progress_breakdown},
};

/// Markdown report covering every section of a plan.
///
/// Empty sections are left out so drafts produce short reports.
pub struct PlanReport<'a> {
    data: &'a WizardData,
    plan: Option<&'a Plan>,
}

impl<'a> PlanReport<'a> {
    pub fn new(data: &'a WizardData) -> Self {
        Self { data, plan: None }
    }

    /// Report of a stored plan, including its record metadata.
    pub fn for_plan(plan: &'a Plan, data: &'a WizardData) -> Self {
        Self {
            data,
            plan: Some(plan),
        }
    }

    fn objective_name(&self, id: &Option<ItemId>) -> &str {
        id.as_ref()
            .and_then(|id| self.data.objectives.iter().find(|o| &o.id == id))
            .map_or("", |o| o.name_en.as_str())
    }
}

/// Escapes a value for a markdown table cell.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn analysis_group(f: &mut fmt::Formatter<'_>, label: &str, items: &[AnalysisItem]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "**{label}**")?;
    writeln!(f)?;
    for item in items {
        writeln!(f, "- {} ({} impact)", item.text_en, item.impact.as_str())?;
    }
    writeln!(f)
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.data;

        writeln!(f, "# {}", d.display_name())?;
        if filled(&d.name_ar) {
            writeln!(f, "\n{}", d.name_ar)?;
        }
        writeln!(f)?;

        if let Some(plan) = self.plan {
            writeln!(f, "- Plan ID: {}", plan.id)?;
            writeln!(f, "- Status: {}", plan.status.as_str())?;
            writeln!(f, "- Approval: {}", plan.approval_status.with_icon())?;
            writeln!(f, "- Version: {}", plan.version_number)?;
            writeln!(f, "- Updated: {}", LocalDateTime(&plan.updated_at))?;
        }
        if d.start_year.is_some() || d.end_year.is_some() {
            writeln!(f, "- Period: {} to {}", opt(d.start_year), opt(d.end_year))?;
        }
        writeln!(f, "- Completeness: {}%", calculate_progress(d))?;
        writeln!(f)?;

        if filled(&d.description_en) {
            writeln!(f, "## Overview")?;
            writeln!(f)?;
            writeln!(f, "{}", d.description_en)?;
            writeln!(f)?;
        }

        if filled(&d.vision_en) || filled(&d.mission_en) || !d.core_values.is_empty() {
            writeln!(f, "## Vision and Mission")?;
            writeln!(f)?;
            if filled(&d.vision_en) {
                writeln!(f, "**Vision:** {}", d.vision_en)?;
                writeln!(f)?;
            }
            if filled(&d.mission_en) {
                writeln!(f, "**Mission:** {}", d.mission_en)?;
                writeln!(f)?;
            }
            for value in &d.core_values {
                writeln!(f, "- **{}**: {}", value.name_en, value.description_en)?;
            }
            if !d.core_values.is_empty() {
                writeln!(f)?;
            }
        }

        if !d.stakeholders.is_empty() {
            writeln!(f, "## Stakeholders")?;
            writeln!(f)?;
            writeln!(f, "| Name | Type | Influence | Interest | Engagement |")?;
            writeln!(f, "|------|------|-----------|----------|------------|")?;
            for s in &d.stakeholders {
                writeln!(
                    f,
                    "| {} | {} | {} | {} | {} |",
                    cell(&s.name_en),
                    cell(&s.stakeholder_type),
                    s.influence.as_str(),
                    s.interest.as_str(),
                    cell(&s.engagement_strategy)
                )?;
            }
            writeln!(f)?;
        }

        if !d.pestel.is_empty() {
            writeln!(f, "## PESTEL Analysis")?;
            writeln!(f)?;
            analysis_group(f, "Political", &d.pestel.political)?;
            analysis_group(f, "Economic", &d.pestel.economic)?;
            analysis_group(f, "Social", &d.pestel.social)?;
            analysis_group(f, "Technological", &d.pestel.technological)?;
            analysis_group(f, "Environmental", &d.pestel.environmental)?;
            analysis_group(f, "Legal", &d.pestel.legal)?;
        }

        if !d.swot.is_empty() {
            writeln!(f, "## SWOT Analysis")?;
            writeln!(f)?;
            analysis_group(f, "Strengths", &d.swot.strengths)?;
            analysis_group(f, "Weaknesses", &d.swot.weaknesses)?;
            analysis_group(f, "Opportunities", &d.swot.opportunities)?;
            analysis_group(f, "Threats", &d.swot.threats)?;
        }

        if !d.risks.is_empty() {
            writeln!(f, "## Risks")?;
            writeln!(f)?;
            writeln!(f, "| Risk | Likelihood | Impact | Score | Mitigation | Owner |")?;
            writeln!(f, "|------|------------|--------|-------|------------|-------|")?;
            for r in &d.risks {
                writeln!(
                    f,
                    "| {} | {} | {} | {} | {} | {} |",
                    cell(&r.title_en),
                    r.likelihood.as_str(),
                    r.impact.as_str(),
                    r.score(),
                    cell(&r.mitigation_en),
                    cell(&r.owner)
                )?;
            }
            writeln!(f)?;
        }

        if !d.dependencies.is_empty() {
            writeln!(f, "## Dependencies")?;
            writeln!(f)?;
            for dep in &d.dependencies {
                writeln!(
                    f,
                    "- {} ({} criticality, {})",
                    dep.name_en,
                    dep.criticality.as_str(),
                    if filled(&dep.status) { dep.status.as_str() } else { "open" }
                )?;
            }
            writeln!(f)?;
        }

        if !d.constraints.is_empty() || !d.assumptions.is_empty() {
            writeln!(f, "## Constraints and Assumptions")?;
            writeln!(f)?;
            for c in &d.constraints {
                writeln!(f, "- Constraint: {}", c.description_en)?;
            }
            for a in &d.assumptions {
                writeln!(f, "- Assumption: {} ({} confidence)", a.statement_en, a.confidence.as_str())?;
            }
            writeln!(f)?;
        }

        if !d.objectives.is_empty() {
            writeln!(f, "## Strategic Objectives")?;
            writeln!(f)?;
            for (i, o) in d.objectives.iter().enumerate() {
                writeln!(f, "{}. **{}** ({} priority)", i + 1, o.name_en, o.priority.as_str())?;
                if filled(&o.description_en) {
                    writeln!(f, "   {}", o.description_en)?;
                }
            }
            writeln!(f)?;
        }

        if !d.kpis.is_empty() {
            writeln!(f, "## Key Performance Indicators")?;
            writeln!(f)?;
            writeln!(f, "| KPI | Objective | Baseline | Target | Unit | Frequency |")?;
            writeln!(f, "|-----|-----------|----------|--------|------|-----------|")?;
            for k in &d.kpis {
                writeln!(
                    f,
                    "| {} | {} | {} | {} | {} | {} |",
                    cell(&k.name_en),
                    cell(self.objective_name(&k.objective_id)),
                    opt(k.baseline),
                    opt(k.target),
                    cell(&k.unit),
                    cell(&k.frequency)
                )?;
            }
            writeln!(f)?;
        }

        if !d.action_plans.is_empty() {
            writeln!(f, "## Action Plans")?;
            writeln!(f)?;
            for a in &d.action_plans {
                writeln!(
                    f,
                    "- **{}**: owner {}, {} to {}",
                    a.name_en,
                    if filled(&a.owner) { a.owner.as_str() } else { "unassigned" },
                    opt(a.start_date),
                    opt(a.end_date)
                )?;
            }
            writeln!(f)?;
        }

        if !d.phases.is_empty() || !d.milestones.is_empty() {
            writeln!(f, "## Timeline")?;
            writeln!(f)?;
            for p in &d.phases {
                writeln!(f, "- Phase **{}**: {} to {}", p.name_en, opt(p.start_date), opt(p.end_date))?;
            }
            for m in &d.milestones {
                writeln!(f, "- Milestone **{}**: {}", m.name_en, opt(m.date))?;
            }
            writeln!(f)?;
        }

        if !d.committees.is_empty() || !d.roles.is_empty() || !d.escalation_steps.is_empty() {
            writeln!(f, "## Governance")?;
            writeln!(f)?;
            for c in &d.committees {
                writeln!(
                    f,
                    "- Committee **{}** chaired by {}, meets {}",
                    c.name_en,
                    if filled(&c.chair) { c.chair.as_str() } else { "-" },
                    if filled(&c.meeting_frequency) { c.meeting_frequency.as_str() } else { "as needed" }
                )?;
            }
            for r in &d.roles {
                writeln!(f, "- Role **{}**: {}", r.title_en, r.responsibilities.join(", "))?;
            }
            let mut steps: Vec<_> = d.escalation_steps.iter().collect();
            steps.sort_by_key(|s| s.level);
            for s in steps {
                writeln!(f, "- Escalation level {}: {} within {}", s.level, s.role, s.timeframe)?;
            }
            writeln!(f)?;
        }

        if !d.raci_entries.is_empty() {
            writeln!(f, "## RACI Matrix")?;
            writeln!(f)?;
            writeln!(f, "| Activity | Responsible | Accountable | Consulted | Informed |")?;
            writeln!(f, "|----------|-------------|-------------|-----------|----------|")?;
            for e in &d.raci_entries {
                writeln!(
                    f,
                    "| {} | {} | {} | {} | {} |",
                    cell(&e.activity),
                    cell(&e.responsible),
                    cell(&e.accountable),
                    cell(&e.consulted.join(", ")),
                    cell(&e.informed.join(", "))
                )?;
            }
            writeln!(f)?;
        }

        if !d.dashboards.is_empty() {
            writeln!(f, "## Monitoring")?;
            writeln!(f)?;
            for dash in &d.dashboards {
                writeln!(f, "- **{}** for {}: {}", dash.name_en, dash.audience, dash.metrics.join(", "))?;
            }
            writeln!(f)?;
        }

        if !d.communication_plan.is_empty() || !d.change_management.is_empty() {
            writeln!(f, "## Communication and Change")?;
            writeln!(f)?;
            let comms = &d.communication_plan;
            if !comms.key_messages_en.is_empty() {
                writeln!(f, "- Key messages: {}", comms.key_messages_en.join("; "))?;
            }
            if !comms.channels.is_empty() {
                writeln!(f, "- Channels: {}", comms.channels.join(", "))?;
            }
            if !comms.audiences.is_empty() {
                writeln!(f, "- Audiences: {}", comms.audiences.join(", "))?;
            }
            let change = &d.change_management;
            if let Some(readiness) = change.readiness {
                writeln!(f, "- Change readiness: {}", readiness.as_str())?;
            }
            if !change.training_needs.is_empty() {
                writeln!(f, "- Training needs: {}", change.training_needs.join(", "))?;
            }
            if !change.resistance_strategies.is_empty() {
                writeln!(f, "- Resistance strategies: {}", change.resistance_strategies.join(", "))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "## Completeness")?;
        writeln!(f)?;
        for (criterion, met) in progress_breakdown(d) {
            writeln!(
                f,
                "- [{}] {} ({}%)",
                if met { "x" } else { " " },
                criterion.label,
                criterion.weight
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Kpi, Objective, Risk};

    #[test]
    fn empty_sections_are_omitted() {
        let data = WizardData {
            name_en: "Lean plan".to_string(),
            ..Default::default()
        };
        let report = PlanReport::new(&data).to_string();
        assert!(report.starts_with("# Lean plan"));
        assert!(!report.contains("## Risks"));
        assert!(report.contains("## Completeness"));
    }

    #[test]
    fn tables_escape_cells_and_link_objectives() {
        let objective = Objective {
            name_en: "Faster permits".to_string(),
            ..Default::default()
        };
        let data = WizardData {
            kpis: vec![Kpi {
                name_en: "Days | to permit".to_string(),
                objective_id: Some(objective.id.clone()),
                ..Default::default()
            }],
            objectives: vec![objective],
            risks: vec![Risk {
                title_en: "Vendor delay".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let report = PlanReport::new(&data).to_string();
        assert!(report.contains("| Days \\| to permit | Faster permits |"));
        assert!(report.contains("## Risks"));
        assert!(report.contains("# Untitled plan"));
    }
}
