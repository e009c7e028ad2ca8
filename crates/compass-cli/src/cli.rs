//! Command-line argument wrappers and their conversions to core parameters.
//!
//! Each wrapper carries the clap derives and help text; the core parameter
//! types stay free of CLI concerns.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → PlanStore / Wizard
//! ```

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use compass_core::{
    models::{PlanStatus, WizardUpdate},
    params::{Id, ListPlans},
    LaunchParams,
};

/// List plans
///
/// Shows live, non-template plans by default. Use --templates for the
/// template gallery and --deleted for the recycle bin.
#[derive(Args)]
pub struct ListPlansArgs {
    /// Only plans whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,
    /// List templates instead of plans
    #[arg(long)]
    pub templates: bool,
    /// Only plans shared publicly
    #[arg(long)]
    pub public: bool,
    /// Only plans in this lifecycle state
    #[arg(short, long)]
    pub status: Option<PlanStatusArg>,
    /// Only plans created by this user
    #[arg(long)]
    pub owner: Option<String>,
    /// List soft-deleted plans
    #[arg(long)]
    pub deleted: bool,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            name_contains: val.name,
            templates: val.templates,
            public_only: val.public,
            status: val.status.map(PlanStatus::from),
            owner: val.owner,
            deleted: val.deleted,
        }
    }
}

/// Show a plan
#[derive(Args)]
pub struct ShowPlanArgs {
    #[arg(help = "Unique identifier of the plan to show")]
    pub id: u64,
    /// Print the full plan report instead of the overview
    #[arg(long)]
    pub report: bool,
}

/// Move a plan to the recycle bin
#[derive(Args)]
pub struct DeletePlanArgs {
    #[arg(help = "Unique identifier of the plan to delete")]
    pub id: u64,
}

impl From<DeletePlanArgs> for Id {
    fn from(val: DeletePlanArgs) -> Self {
        Id { id: val.id }
    }
}

/// Restore a plan from the recycle bin
#[derive(Args)]
pub struct RestorePlanArgs {
    #[arg(help = "Unique identifier of the deleted plan to restore")]
    pub id: u64,
}

impl From<RestorePlanArgs> for Id {
    fn from(val: RestorePlanArgs) -> Self {
        Id { id: val.id }
    }
}

/// Export a plan
///
/// The CSV workbook holds one sheet per section, each row tagged with its
/// sheet name. The report is markdown ready for PDF conversion.
#[derive(Args)]
pub struct ExportPlanArgs {
    #[arg(help = "Unique identifier of the plan to export")]
    pub id: u64,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormatArg::Csv)]
    pub format: ExportFormatArg,
    /// Write to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// Move a plan to the recycle bin
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
    /// Restore a plan from the recycle bin
    #[command(alias = "r")]
    Restore(RestorePlanArgs),
    /// Export a plan as a CSV workbook or markdown report
    #[command(alias = "e")]
    Export(ExportPlanArgs),
}

/// Wizard content to merge into a plan, as a JSON object of top-level keys.
#[derive(Args)]
pub struct PatchArgs {
    /// Read the update from a JSON file
    #[arg(short, long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Inline JSON update, e.g. '{"vision_en": "..."}'
    #[arg(long)]
    pub json: Option<String>,
}

impl PatchArgs {
    /// Parses the update, if one was given.
    pub fn load(&self) -> Result<Option<WizardUpdate>> {
        let raw = match (&self.file, &self.json) {
            (Some(path), _) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, Some(json)) => json.clone(),
            (None, None) => return Ok(None),
        };
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Update is not valid JSON")?;
        let update = WizardUpdate::from_json(value).context("Update does not fit the plan")?;
        Ok(Some(update))
    }

    /// Parses the update, failing when none was given.
    pub fn require(&self) -> Result<WizardUpdate> {
        match self.load()? {
            Some(update) => Ok(update),
            None => bail!("Provide the update with --file or --json"),
        }
    }
}

/// Start a new plan
#[derive(Args)]
pub struct NewWizardArgs {
    /// Seed the plan from this template
    #[arg(short, long)]
    pub template: Option<u64>,
    #[command(flatten)]
    pub patch: PatchArgs,
    /// Submit the plan for approval right away
    #[arg(long)]
    pub submit: bool,
}

impl From<&NewWizardArgs> for LaunchParams {
    fn from(val: &NewWizardArgs) -> Self {
        match val.template {
            Some(template) => LaunchParams::from_template(template),
            None => LaunchParams::new_plan(),
        }
    }
}

/// Merge content into a plan's draft
#[derive(Args)]
pub struct ApplyArgs {
    #[arg(help = "Unique identifier of the plan to edit")]
    pub id: u64,
    #[command(flatten)]
    pub patch: PatchArgs,
}

/// Arguments naming a single plan.
#[derive(Args)]
pub struct PlanIdArgs {
    #[arg(help = "Unique identifier of the plan")]
    pub id: u64,
}

/// Check a step's required fields
#[derive(Args)]
pub struct ValidateArgs {
    #[arg(help = "Unique identifier of the plan")]
    pub id: u64,
    /// Step to check; defaults to the plan's last saved step
    #[arg(short, long)]
    pub step: Option<u8>,
}

/// Fill a step with AI suggestions
#[derive(Args)]
pub struct GenerateArgs {
    #[arg(help = "Unique identifier of the plan")]
    pub id: u64,
    /// Step to generate content for
    #[arg(short, long)]
    pub step: u8,
}

#[derive(Subcommand)]
pub enum WizardCommands {
    /// Start a new plan, optionally from a template
    #[command(alias = "n")]
    New(NewWizardArgs),
    /// Merge content into a plan's draft
    #[command(alias = "a")]
    Apply(ApplyArgs),
    /// Validate the current step and advance
    Next(PlanIdArgs),
    /// Check a step's required fields
    #[command(alias = "v")]
    Validate(ValidateArgs),
    /// Show completeness per step
    Progress(PlanIdArgs),
    /// Submit a plan for approval
    Submit(PlanIdArgs),
    /// Fill a step with AI suggestions
    #[command(alias = "g")]
    Generate(GenerateArgs),
}

impl From<&PlanIdArgs> for LaunchParams {
    fn from(val: &PlanIdArgs) -> Self {
        LaunchParams::edit(val.id)
    }
}

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Show the local draft
    Show,
    /// Load the local draft and save it to its plan
    Recover,
    /// Delete the local draft
    Discard,
}

/// Plan lifecycle states accepted by `--status`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlanStatusArg {
    Draft,
    Active,
    Completed,
    Archived,
}

impl From<PlanStatusArg> for PlanStatus {
    fn from(val: PlanStatusArg) -> Self {
        match val {
            PlanStatusArg::Draft => PlanStatus::Draft,
            PlanStatusArg::Active => PlanStatus::Active,
            PlanStatusArg::Completed => PlanStatus::Completed,
            PlanStatusArg::Archived => PlanStatus::Archived,
        }
    }
}

/// Export formats
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// Sheet-tagged CSV workbook
    Csv,
    /// Markdown report
    Report,
}
