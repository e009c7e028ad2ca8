//! Plan exports: a printable markdown report and a multi-sheet spreadsheet.
//!
//! Both are generated from [`WizardData`](crate::models::WizardData) alone, so
//! unsaved wizard state exports the same way as a stored plan.

mod report;
mod spreadsheet;

use std::io;

pub use report::PlanReport;
pub use spreadsheet::{
    ExportSummary, Sheet, Workbook, KPIS_SHEET, OBJECTIVES_SHEET, SUMMARY_SHEET,
};

use crate::{error::Result, models::WizardData};

/// Builds the workbook of a plan and writes it as CSV.
pub fn write_workbook<W: io::Write>(data: &WizardData, writer: W) -> Result<()> {
    Workbook::from_plan(data).write_csv(writer)
}

/// Parses a workbook written by [`write_workbook`].
pub fn read_workbook<R: io::Read>(reader: R) -> Result<Workbook> {
    Workbook::from_csv(reader)
}
