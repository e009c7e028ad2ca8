//! Command handlers: each one runs a short wizard or store operation and
//! renders its outcome through the core Display wrappers.

use std::{fs, io, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use compass_core::{
    display::{
        CreateResult, DeleteResult, Notices, OperationStatus, PlanSummaries, ProgressReport,
        RestoreResult, SaveResult, StepTable, SubmitResult, UpdateResult,
    },
    export::{write_workbook, PlanReport},
    models::{PlanSummary, LAST_STEP},
    params::{Id, ListPlans},
    validation::{validate_step, validate_submission},
    AiConfig, CompassError, DraftStore, FileDraftStore, HttpCompletionService, Language,
    LaunchParams, PlanBackend, PlanFilter, PlanStore, Wizard, WizardContext,
};
use log::{debug, info};

use crate::{
    cli::{
        ApplyArgs, DraftCommands, ExportFormatArg, ExportPlanArgs, GenerateArgs, NewWizardArgs,
        PlanCommands, PlanIdArgs, ShowPlanArgs, ValidateArgs, WizardCommands,
    },
    renderer::TerminalRenderer,
};

/// Settings gathered from the global flags.
pub struct Settings {
    pub ai: AiConfig,
    pub language: Language,
    pub user: Option<String>,
}

/// Runs CLI commands against one plan store and draft slot.
pub struct Cli {
    store: Arc<PlanStore>,
    drafts: Arc<FileDraftStore>,
    context: WizardContext,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        store: PlanStore,
        drafts: FileDraftStore,
        settings: Settings,
        renderer: TerminalRenderer,
    ) -> Result<Self> {
        let store = Arc::new(store);
        let drafts = Arc::new(drafts);

        let mut context = WizardContext::new(store.clone(), drafts.clone())
            .with_language(settings.language);
        if let Some(user) = settings.user {
            context = context.with_user(user);
        }
        if settings.ai.is_available() {
            let service = HttpCompletionService::new(&settings.ai)
                .context("Failed to configure AI service")?;
            info!("AI assistance enabled via {}", service.endpoint());
            context = context.with_ai(Arc::new(service));
        }

        Ok(Self {
            store,
            drafts,
            context,
            renderer,
        })
    }

    async fn open(&self, launch: &LaunchParams) -> Result<Wizard> {
        debug!("Opening wizard: {launch:?}");
        Wizard::open(self.context.clone(), launch)
            .await
            .context("Failed to open wizard")
    }

    fn render_notices(&self, wizard: &mut Wizard) -> Result<()> {
        let notices = wizard.take_notices();
        if notices.is_empty() {
            return Ok(());
        }
        self.renderer.render(&Notices(&notices).to_string())
    }

    pub fn show_steps(&self) -> Result<()> {
        self.renderer
            .render(&format!("# Wizard Steps\n\n{}", StepTable::new()))
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(args).await,
            PlanCommands::Delete(args) => {
                let Id { id } = args.into();
                let plan = self
                    .store
                    .soft_delete_plan(id)
                    .await
                    .context("Failed to delete plan")?;
                self.renderer.render(&DeleteResult::new(plan).to_string())
            }
            PlanCommands::Restore(args) => {
                let Id { id } = args.into();
                let plan = self
                    .store
                    .restore_plan(id)
                    .await
                    .context("Failed to restore plan")?;
                self.renderer.render(&RestoreResult(plan).to_string())
            }
            PlanCommands::Export(args) => self.export_plan(args).await,
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let plans = self
            .store
            .list_plans(&PlanFilter::from(params))
            .await
            .context("Failed to list plans")?;
        let summaries = PlanSummaries(plans.iter().map(PlanSummary::from).collect());

        let title = if params.deleted {
            "Recycle Bin"
        } else if params.templates {
            "Templates"
        } else {
            "Plans"
        };
        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }

    async fn show_plan(&self, args: ShowPlanArgs) -> Result<()> {
        let plan = self
            .store
            .get_plan(args.id)
            .await
            .context("Failed to get plan")?
            .ok_or_else(|| anyhow!("Plan with ID {} not found", args.id))?;

        if args.report {
            let working = plan.working_data();
            self.renderer
                .render(&PlanReport::for_plan(&plan, &working).to_string())
        } else {
            self.renderer.render(&plan.to_string())
        }
    }

    async fn export_plan(&self, args: ExportPlanArgs) -> Result<()> {
        let plan = self
            .store
            .get_live_plan(args.id)
            .await
            .context("Failed to get plan")?;
        let working = plan.working_data();

        let Some(path) = args.output.as_ref() else {
            return match args.format {
                ExportFormatArg::Csv => {
                    write_workbook(&working, io::stdout().lock()).context("Failed to export plan")
                }
                ExportFormatArg::Report => self
                    .renderer
                    .render(&PlanReport::for_plan(&plan, &working).to_string()),
            };
        };

        match args.format {
            ExportFormatArg::Csv => {
                let file = fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_workbook(&working, file).context("Failed to export plan")?;
            }
            ExportFormatArg::Report => {
                let report = PlanReport::for_plan(&plan, &working).to_string();
                fs::write(path, report)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        info!("Exported plan {} to {}", plan.id, path.display());
        self.renderer.render(
            &OperationStatus::success(format!("Exported plan {} to {}", plan.id, path.display()))
                .to_string(),
        )
    }

    pub async fn handle_wizard_command(&self, command: WizardCommands) -> Result<()> {
        match command {
            WizardCommands::New(args) => self.new_plan(args).await,
            WizardCommands::Apply(args) => self.apply(args).await,
            WizardCommands::Next(args) => self.next(args).await,
            WizardCommands::Validate(args) => self.validate(args).await,
            WizardCommands::Progress(args) => self.progress(args).await,
            WizardCommands::Submit(args) => self.submit(args).await,
            WizardCommands::Generate(args) => self.generate(args).await,
        }
    }

    async fn new_plan(&self, args: NewWizardArgs) -> Result<()> {
        let mut wizard = self.open(&LaunchParams::from(&args)).await?;
        // A pending recovery is offered by `draft recover`, not merged here
        wizard.take_notices();

        if let Some(update) = args.patch.load()? {
            wizard.update_data(update);
        }

        if args.submit {
            return self.submit_session(&mut wizard).await;
        }

        let receipt = wizard.save_draft().await.context("Failed to save plan")?;
        wizard.take_notices();
        let plan = self.store.get_live_plan(receipt.plan_id).await?;
        self.renderer.render(&CreateResult::new(plan).to_string())
    }

    async fn apply(&self, args: ApplyArgs) -> Result<()> {
        let update = args.patch.require()?;
        let mut wizard = self.open(&LaunchParams::edit(args.id)).await?;

        let changes: Vec<String> = update.keys().into_iter().map(str::to_string).collect();
        if !wizard.update_data(update) {
            bail!("Nothing to apply");
        }
        wizard.save_draft().await.context("Failed to save plan")?;
        wizard.take_notices();

        let plan = self.store.get_live_plan(args.id).await?;
        self.renderer
            .render(&UpdateResult::with_changes(plan, changes).to_string())
    }

    async fn next(&self, args: PlanIdArgs) -> Result<()> {
        let mut wizard = self.open(&LaunchParams::from(&args)).await?;
        let leaving = wizard.current_step();

        if !wizard.handle_next() {
            self.render_notices(&mut wizard)?;
            bail!("Step {leaving} is incomplete");
        }
        wizard.save_draft().await.context("Failed to save plan")?;
        wizard.take_notices();

        self.renderer.render(&format!(
            "Completed step {leaving}. Now on {}\n",
            wizard.current_step_info()
        ))
    }

    async fn validate(&self, args: ValidateArgs) -> Result<()> {
        let wizard = self.open(&LaunchParams::review(args.id)).await?;
        let step = args.step.unwrap_or_else(|| wizard.current_step());

        let result = if step == LAST_STEP {
            validate_submission(wizard.data())
        } else {
            compass_core::models::step_info(step)?;
            validate_step(step, wizard.data())
        };
        self.renderer
            .render(&format!("# Step {step} validation\n\n{result}"))
    }

    async fn progress(&self, args: PlanIdArgs) -> Result<()> {
        let wizard = self.open(&LaunchParams::review(args.id)).await?;
        let table = StepTable::new()
            .with_data(wizard.data())
            .with_position(wizard.current_step(), wizard.completed_steps());

        self.renderer.render(&format!(
            "{}\n{table}",
            ProgressReport(wizard.data())
        ))
    }

    async fn submit(&self, args: PlanIdArgs) -> Result<()> {
        let mut wizard = self.open(&LaunchParams::from(&args)).await?;
        self.submit_session(&mut wizard).await
    }

    async fn submit_session(&self, wizard: &mut Wizard) -> Result<()> {
        match wizard.submit().await {
            Ok(plan) => {
                wizard.take_notices();
                self.renderer.render(&SubmitResult(plan).to_string())
            }
            Err(CompassError::SubmissionBlocked { errors }) => {
                self.render_notices(wizard)?;
                bail!("Submission blocked by {} issue(s)", errors.len())
            }
            Err(e) => Err(e).context("Failed to submit plan"),
        }
    }

    async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let mut wizard = self.open(&LaunchParams::edit(args.id)).await?;
        if !wizard.ai_available() {
            bail!("AI assistance is not configured; set --ai-endpoint or COMPASS_AI_ENDPOINT");
        }

        let outcome = wizard.generate_for_step(args.step).await?;
        let Some(outcome) = outcome else {
            self.render_notices(&mut wizard)?;
            bail!("No AI suggestions were applied");
        };
        if !outcome.applied.is_empty() {
            wizard.save_draft().await.context("Failed to save plan")?;
        }
        wizard.take_notices();
        self.renderer.render(&outcome.to_string())
    }

    pub async fn handle_draft_command(&self, command: DraftCommands) -> Result<()> {
        match command {
            DraftCommands::Show => match self.drafts.load()? {
                Some(draft) => self.renderer.render(&draft.to_string()),
                None => self.renderer.render("No local draft found.\n"),
            },
            DraftCommands::Recover => {
                let mut wizard = self.open(&LaunchParams::new_plan()).await?;
                if !wizard.recover_local_draft().await? {
                    return self.renderer.render("No local draft found.\n");
                }
                let receipt = wizard.save_draft().await.context("Failed to save plan")?;
                wizard.take_notices();
                self.renderer.render(&SaveResult(receipt).to_string())
            }
            DraftCommands::Discard => {
                self.drafts.clear()?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Discarded local draft at {}",
                        self.drafts.path().display()
                    ))
                    .to_string(),
                )
            }
        }
    }
}
