//! Multi-sheet spreadsheet export.
//!
//! A [`Workbook`] is a list of named sheets. It is written as a single CSV
//! stream in which the first column of every record names the sheet and the
//! remaining columns are that sheet's cells; the first record of each sheet is
//! its header row. Any spreadsheet tool can split the stream with a filter on
//! the first column, and [`Workbook::from_csv`] reads it back.

use std::io;

use crate::{
    error::{CompassError, Result},
    models::{AnalysisItem, ItemId, WizardData},
    validation::calculate_progress,
};

pub const SUMMARY_SHEET: &str = "Summary";
pub const OBJECTIVES_SHEET: &str = "Objectives";
pub const KPIS_SHEET: &str = "KPIs";

const PLAN_NAME_FIELD: &str = "Plan name";
const COMPLETENESS_FIELD: &str = "Completeness";

/// One named sheet; `rows[0]` is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: vec![header.iter().map(|h| h.to_string()).collect()],
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows after the header.
    pub fn records(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Sheet-by-sheet export of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Headline figures read back from an exported workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub plan_name: String,
    pub objectives: usize,
    pub kpis: usize,
    pub completeness: Option<u8>,
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn list(values: &[String]) -> String {
    values.join("; ")
}

fn analysis_rows(sheet: &mut Sheet, group: &str, items: &[AnalysisItem]) {
    for item in items {
        sheet.push(vec![
            group.to_string(),
            item.text_en.clone(),
            item.text_ar.clone(),
            item.impact.as_str().to_string(),
        ]);
    }
}

impl Workbook {
    /// Lays a plan out over the standard sheets.
    pub fn from_plan(data: &WizardData) -> Self {
        let objective_name = |id: &Option<ItemId>| -> String {
            id.as_ref()
                .and_then(|id| data.objectives.iter().find(|o| &o.id == id))
                .map(|o| o.name_en.clone())
                .unwrap_or_default()
        };
        let phase_name = |id: &Option<ItemId>| -> String {
            id.as_ref()
                .and_then(|id| data.phases.iter().find(|p| &p.id == id))
                .map(|p| p.name_en.clone())
                .unwrap_or_default()
        };

        let period = match (data.start_year, data.end_year) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            (start, end) => format!("{}-{}", opt(start), opt(end)),
        };
        let mut summary = Sheet::new(SUMMARY_SHEET, &["Field", "Value"]);
        for (field, value) in [
            (PLAN_NAME_FIELD, data.name_en.clone()),
            ("Plan name (Arabic)", data.name_ar.clone()),
            ("Period", period),
            ("Vision", data.vision_en.clone()),
            ("Mission", data.mission_en.clone()),
            ("Objectives", data.objectives.len().to_string()),
            ("KPIs", data.kpis.len().to_string()),
            ("Risks", data.risks.len().to_string()),
            (COMPLETENESS_FIELD, format!("{}%", calculate_progress(data))),
        ] {
            summary.push(vec![field.to_string(), value]);
        }

        let mut objectives = Sheet::new(
            OBJECTIVES_SHEET,
            &["Name", "Name (Arabic)", "Sector", "Priority", "Target year", "Description"],
        );
        for o in &data.objectives {
            objectives.push(vec![
                o.name_en.clone(),
                o.name_ar.clone(),
                o.sector.clone(),
                o.priority.as_str().to_string(),
                opt(o.target_year),
                o.description_en.clone(),
            ]);
        }

        let mut kpis = Sheet::new(
            KPIS_SHEET,
            &[
                "Name",
                "Name (Arabic)",
                "Objective",
                "Unit",
                "Baseline",
                "Target",
                "Frequency",
                "Data source",
            ],
        );
        for k in &data.kpis {
            kpis.push(vec![
                k.name_en.clone(),
                k.name_ar.clone(),
                objective_name(&k.objective_id),
                k.unit.clone(),
                opt(k.baseline),
                opt(k.target),
                k.frequency.clone(),
                k.data_source.clone(),
            ]);
        }

        let mut stakeholders = Sheet::new(
            "Stakeholders",
            &["Name", "Name (Arabic)", "Type", "Influence", "Interest", "Engagement"],
        );
        for s in &data.stakeholders {
            stakeholders.push(vec![
                s.name_en.clone(),
                s.name_ar.clone(),
                s.stakeholder_type.clone(),
                s.influence.as_str().to_string(),
                s.interest.as_str().to_string(),
                s.engagement_strategy.clone(),
            ]);
        }

        let mut swot = Sheet::new("SWOT", &["Quadrant", "Item", "Item (Arabic)", "Impact"]);
        analysis_rows(&mut swot, "Strength", &data.swot.strengths);
        analysis_rows(&mut swot, "Weakness", &data.swot.weaknesses);
        analysis_rows(&mut swot, "Opportunity", &data.swot.opportunities);
        analysis_rows(&mut swot, "Threat", &data.swot.threats);

        let mut pestel = Sheet::new("PESTEL", &["Factor", "Item", "Item (Arabic)", "Impact"]);
        analysis_rows(&mut pestel, "Political", &data.pestel.political);
        analysis_rows(&mut pestel, "Economic", &data.pestel.economic);
        analysis_rows(&mut pestel, "Social", &data.pestel.social);
        analysis_rows(&mut pestel, "Technological", &data.pestel.technological);
        analysis_rows(&mut pestel, "Environmental", &data.pestel.environmental);
        analysis_rows(&mut pestel, "Legal", &data.pestel.legal);

        let mut risks = Sheet::new(
            "Risks",
            &["Title", "Category", "Likelihood", "Impact", "Score", "Mitigation", "Owner"],
        );
        for r in &data.risks {
            risks.push(vec![
                r.title_en.clone(),
                r.category.clone(),
                r.likelihood.as_str().to_string(),
                r.impact.as_str().to_string(),
                r.score().to_string(),
                r.mitigation_en.clone(),
                r.owner.clone(),
            ]);
        }

        let mut actions = Sheet::new(
            "Action Plans",
            &["Name", "Objective", "Owner", "Budget", "Start", "End"],
        );
        for a in &data.action_plans {
            actions.push(vec![
                a.name_en.clone(),
                objective_name(&a.objective_id),
                a.owner.clone(),
                opt(a.budget),
                opt(a.start_date),
                opt(a.end_date),
            ]);
        }

        let mut timeline = Sheet::new(
            "Timeline",
            &["Type", "Name", "Start", "End", "Phase", "Deliverables"],
        );
        for p in &data.phases {
            timeline.push(vec![
                "Phase".to_string(),
                p.name_en.clone(),
                opt(p.start_date),
                opt(p.end_date),
                String::new(),
                String::new(),
            ]);
        }
        for m in &data.milestones {
            timeline.push(vec![
                "Milestone".to_string(),
                m.name_en.clone(),
                opt(m.date),
                opt(m.date),
                phase_name(&m.phase_id),
                list(&m.deliverables),
            ]);
        }

        let mut committees = Sheet::new(
            "Committees",
            &["Name", "Chair", "Members", "Meets", "Responsibilities"],
        );
        for c in &data.committees {
            committees.push(vec![
                c.name_en.clone(),
                c.chair.clone(),
                list(&c.members),
                c.meeting_frequency.clone(),
                list(&c.responsibilities),
            ]);
        }

        let mut raci = Sheet::new(
            "RACI",
            &["Activity", "Responsible", "Accountable", "Consulted", "Informed"],
        );
        for entry in &data.raci_entries {
            raci.push(vec![
                entry.activity.clone(),
                entry.responsible.clone(),
                entry.accountable.clone(),
                list(&entry.consulted),
                list(&entry.informed),
            ]);
        }

        Self {
            sheets: vec![
                summary,
                objectives,
                kpis,
                stakeholders,
                swot,
                pestel,
                risks,
                actions,
                timeline,
                committees,
                raci,
            ],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Writes the workbook as one sheet-tagged CSV stream.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        for sheet in &self.sheets {
            for row in &sheet.rows {
                let record =
                    std::iter::once(sheet.name.as_str()).chain(row.iter().map(String::as_str));
                csv.write_record(record).map_err(csv_error)?;
            }
        }
        csv.flush().map_err(|e| CompassError::export(format!("failed to flush CSV: {e}")))
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| CompassError::export(e.to_string()))
    }

    /// Reads a stream written by [`Workbook::write_csv`].
    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut sheets: Vec<Sheet> = Vec::new();
        for record in csv.records() {
            let record = record.map_err(csv_error)?;
            let Some(name) = record.get(0) else {
                continue;
            };
            let row: Vec<String> = record.iter().skip(1).map(str::to_string).collect();
            match sheets.last_mut() {
                Some(sheet) if sheet.name == name => sheet.rows.push(row),
                _ => sheets.push(Sheet {
                    name: name.to_string(),
                    rows: vec![row],
                }),
            }
        }
        Ok(Self { sheets })
    }

    /// Reads the headline figures back out of the sheets.
    pub fn summary(&self) -> Result<ExportSummary> {
        let summary = self
            .sheet(SUMMARY_SHEET)
            .ok_or_else(|| CompassError::export("workbook has no Summary sheet"))?;
        let field = |name: &str| {
            summary
                .records()
                .iter()
                .find(|row| row.first().is_some_and(|f| f == name))
                .and_then(|row| row.get(1))
                .cloned()
        };
        let count = |sheet: &str| self.sheet(sheet).map_or(0, |s| s.records().len());

        Ok(ExportSummary {
            plan_name: field(PLAN_NAME_FIELD).unwrap_or_default(),
            objectives: count(OBJECTIVES_SHEET),
            kpis: count(KPIS_SHEET),
            completeness: field(COMPLETENESS_FIELD)
                .and_then(|v| v.trim_end_matches('%').parse().ok()),
        })
    }
}

fn csv_error(e: csv::Error) -> CompassError {
    CompassError::export(format!("CSV error: {e}"))
}
