//! Display implementations for domain models.
//!
//! Output is markdown so the CLI can render it with termimad or print it
//! plain.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    autosave::LocalDraft,
    models::{
        step_info, ApprovalStatus, Language, Level, Plan, PlanStatus, PlanSummary, StepInfo,
        LAST_STEP,
    },
    validation::{calculate_progress, ValidationResult},
    wizard::{GenerationOutcome, WizardMode},
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for WizardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}. {}", self.icon, self.number, self.title)
    }
}

fn step_label(step: u8) -> String {
    match step_info(step) {
        Ok(info) => format!("{step} of {LAST_STEP} ({})", info.title),
        Err(_) => format!("{step} of {LAST_STEP}"),
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let working = self.working_data();

        writeln!(f, "# {}. {}", self.id, working.display_name())?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Approval: {}", self.approval_status.with_icon())?;
        writeln!(f, "- Version: {}", self.version_number)?;
        writeln!(f, "- Last step: {}", step_label(self.last_saved_step))?;
        writeln!(f, "- Completeness: {}%", calculate_progress(&working))?;
        if self.is_template {
            writeln!(f, "- Template{}", if self.is_public { " (public)" } else { "" })?;
        }
        if let Some(ref owner) = self.owner_id {
            writeln!(f, "- Owner: {owner}")?;
        }
        if let Some(ref draft) = self.draft_data {
            writeln!(f, "- Unsubmitted changes: {}", draft.keys().join(", "))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        if let Some(ref submitted) = self.submitted_at {
            writeln!(f, "- Submitted: {}", LocalDateTime(submitted))?;
        }
        if let Some(ref deleted) = self.deleted_at {
            writeln!(f, "- Deleted: {}", LocalDateTime(deleted))?;
        }

        if !working.description_en.trim().is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", working.description_en)?;
        }
        if !working.vision_en.trim().is_empty() {
            writeln!(f)?;
            writeln!(f, "**Vision:** {}", working.vision_en)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{} objectives, {} KPIs, {} risks, {} action plans",
            working.objectives.len(),
            working.kpis.len(),
            working.risks.len(),
            working.action_plans.len()
        )
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {}) ({}%)", self.title, self.id, self.progress)?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Status**: {} / {}",
            self.status,
            self.approval_status.with_icon()
        )?;
        writeln!(f, "- **Version**: {}", self.version_number)?;
        writeln!(
            f,
            "- **Content**: {} objectives, {} KPIs",
            self.objective_count, self.kpi_count
        )?;
        if self.has_draft {
            writeln!(f, "- **Draft**: unsubmitted changes at step {}", self.last_saved_step)?;
        }
        if self.is_deleted {
            writeln!(f, "- **Deleted**")?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return writeln!(f, "All checks passed.");
        }
        writeln!(f, "{} issue(s) found:", self.errors.len())?;
        writeln!(f)?;
        for error in &self.errors {
            writeln!(f, "- **{}**: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for LocalDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Local draft: {}", self.data.display_name())?;
        writeln!(f)?;
        writeln!(f, "- Saved: {}", LocalDateTime(&self.saved_at))?;
        writeln!(f, "- Step: {}", step_label(self.step))?;
        match self.plan_id {
            Some(id) => writeln!(f, "- Plan: {id}")?,
            None => writeln!(f, "- Plan: not yet created")?,
        }
        writeln!(f, "- Completeness: {}%", calculate_progress(&self.data))
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI suggestions for {}", step_label(self.step))?;
        writeln!(f)?;
        if self.applied.is_empty() {
            writeln!(f, "No usable content was returned.")?;
        } else {
            writeln!(f, "Filled: {}", self.applied.join(", "))?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "Kept previous: {}", self.skipped.join(", "))?;
        }
        Ok(())
    }
}
