//! Collection wrapper types for displaying groups of domain objects.

use std::{collections::BTreeSet, fmt, ops::Index};

use crate::{
    models::{PlanSummary, WizardData, STEPS},
    validation::step_completeness,
};

/// Newtype wrapper for displaying plan summaries; handles empty lists.
///
/// ```rust
/// use compass_core::display::PlanSummaries;
///
/// let summaries = PlanSummaries(vec![]);
/// assert_eq!(summaries.to_string(), "No plans found.\n");
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for PlanSummaries {
    type Item = PlanSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{plan}")?;
            }
            Ok(())
        }
    }
}

/// The step table, optionally annotated with a plan's progress.
pub struct StepTable<'a> {
    data: Option<&'a WizardData>,
    current: Option<u8>,
    completed: Option<&'a BTreeSet<u8>>,
}

impl<'a> StepTable<'a> {
    /// Bare table of all steps.
    pub fn new() -> Self {
        Self {
            data: None,
            current: None,
            completed: None,
        }
    }

    /// Adds per-step completeness for a plan.
    pub fn with_data(mut self, data: &'a WizardData) -> Self {
        self.data = Some(data);
        self
    }

    /// Marks the current step and the completed ones.
    pub fn with_position(mut self, current: u8, completed: &'a BTreeSet<u8>) -> Self {
        self.current = Some(current);
        self.completed = Some(completed);
        self
    }
}

impl Default for StepTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data {
            Some(_) => {
                writeln!(f, "| # | Step | Key | Filled |")?;
                writeln!(f, "|---|------|-----|--------|")?;
            }
            None => {
                writeln!(f, "| # | Step | Key |")?;
                writeln!(f, "|---|------|-----|")?;
            }
        }

        for step in STEPS.iter() {
            let marker = if self.current == Some(step.number) {
                "➤ "
            } else if self.completed.is_some_and(|c| c.contains(&step.number)) {
                "✓ "
            } else {
                ""
            };
            write!(
                f,
                "| {} | {marker}{} {} | {} |",
                step.number, step.icon, step.title, step.key
            )?;
            if let Some(data) = self.data {
                write!(f, " {}% |", step_completeness(step.number, data))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
