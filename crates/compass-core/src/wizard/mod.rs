//! The 18-step plan wizard.
//!
//! A [`Wizard`] owns the working [`WizardData`] of one session, the current
//! step and the set of completed steps. Edits go through
//! [`Wizard::update_data`], which merges them and schedules a debounced
//! auto-save. Navigation validates the step being left; submission checks the
//! plan as a whole.
//!
//! User-facing outcomes (validation failures, save results, AI results) are
//! queued as [`Notice`]s for the interface layer to show.

mod generation;
mod launch;

use std::{collections::BTreeSet, fmt, sync::Arc};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use generation::GenerationOutcome;
pub use launch::{Hydration, LaunchParams, WizardMode};

use crate::{
    ai::CompletionService,
    autosave::{AutoSaver, DraftStore, SaveBinding},
    config::AutoSaveConfig,
    error::{CompassError, Result},
    models::{
        step_info, Language, Plan, SaveReceipt, StepInfo, WizardData, WizardUpdate, FIRST_STEP,
        LAST_STEP,
    },
    store::PlanBackend,
    validation::{
        calculate_progress, step_completeness, validate_step, validate_submission,
        ValidationResult,
    },
};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user, the wizard's equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything a session needs from its surroundings.
#[derive(Clone)]
pub struct WizardContext {
    pub backend: Arc<dyn PlanBackend>,
    pub drafts: Arc<dyn DraftStore>,
    pub ai: Option<Arc<dyn CompletionService>>,
    pub language: Language,
    /// Acting user, recorded as owner of created plans
    pub user_id: Option<String>,
    pub autosave: AutoSaveConfig,
}

impl WizardContext {
    pub fn new(backend: Arc<dyn PlanBackend>, drafts: Arc<dyn DraftStore>) -> Self {
        Self {
            backend,
            drafts,
            ai: None,
            language: Language::default(),
            user_id: None,
            autosave: AutoSaveConfig::default(),
        }
    }

    pub fn with_ai(mut self, ai: Arc<dyn CompletionService>) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_autosave(mut self, autosave: AutoSaveConfig) -> Self {
        self.autosave = autosave;
        self
    }
}

impl fmt::Debug for WizardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardContext")
            .field("ai", &self.ai.is_some())
            .field("language", &self.language)
            .field("user_id", &self.user_id)
            .field("autosave", &self.autosave)
            .finish()
    }
}

/// Snapshot of auto-save state for status indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStatus {
    pub plan_id: Option<u64>,
    pub version_number: Option<u32>,
    pub is_saving: bool,
    pub has_pending: bool,
    pub last_saved: Option<Timestamp>,
    pub last_error: Option<String>,
}

/// One wizard session.
#[derive(Debug)]
pub struct Wizard {
    context: WizardContext,
    data: WizardData,
    current_step: u8,
    completed_steps: BTreeSet<u8>,
    mode: WizardMode,
    hydration: Hydration,
    autosaver: AutoSaver,
    notices: Vec<Notice>,
    generating: Option<u8>,
}

impl Wizard {
    /// Opens a session and hydrates it from the launch parameters.
    ///
    /// A template seeds a new plan, an id loads that plan (with its draft
    /// overlay) in edit or review mode, and otherwise the session starts
    /// empty, reporting a recoverable local draft if one exists.
    pub async fn open(context: WizardContext, launch: &LaunchParams) -> Result<Self> {
        let autosaver = AutoSaver::new(
            Arc::clone(&context.backend),
            Arc::clone(&context.drafts),
            context.autosave,
        );
        let mut wizard = Self {
            data: WizardData::default(),
            current_step: FIRST_STEP,
            completed_steps: BTreeSet::new(),
            mode: launch.resolved_mode(),
            hydration: Hydration::Fresh,
            autosaver,
            notices: Vec::new(),
            generating: None,
            context,
        };

        if let Some(template_id) = launch.template {
            let template = wizard.context.backend.get_template(template_id).await?;
            wizard.data = template.working_data();
            wizard.hydration = Hydration::FromTemplate { template_id };
            wizard.bind_new_plan();
            log::info!("Seeded wizard from template {template_id}");
        } else if let Some(plan_id) = launch.id {
            let plan = wizard.context.backend.get_live_plan(plan_id).await?;
            wizard.load_plan(&plan);
            wizard.hydration = Hydration::FromPlan { plan_id };
            log::info!("Opened plan {plan_id} in {} mode", wizard.mode.as_str());
        } else {
            wizard.bind_new_plan();
            if let Some(draft) = wizard.autosaver.load_local_draft()? {
                wizard.hydration = Hydration::RecoveryAvailable {
                    saved_at: draft.saved_at,
                    step: draft.step,
                    plan_id: draft.plan_id,
                };
                wizard.notify(
                    NoticeLevel::Info,
                    "An unsaved draft from a previous session can be recovered",
                );
            }
        }

        Ok(wizard)
    }

    fn bind_new_plan(&self) {
        self.autosaver.bind(SaveBinding {
            plan_id: None,
            owner_id: self.context.user_id.clone(),
        });
    }

    fn load_plan(&mut self, plan: &Plan) {
        self.data = plan.working_data();
        self.current_step = clamp_step(plan.last_saved_step);
        self.autosaver.bind(SaveBinding {
            plan_id: Some(plan.id),
            owner_id: plan.owner_id.clone(),
        });
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        log::debug!("Notice ({:?}): {}", notice.level, notice.message);
        self.notices.push(notice);
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn current_step_info(&self) -> &'static StepInfo {
        // current_step is kept within FIRST_STEP..=LAST_STEP
        &crate::models::STEPS[usize::from(self.current_step - FIRST_STEP)]
    }

    pub fn completed_steps(&self) -> &BTreeSet<u8> {
        &self.completed_steps
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode.is_read_only()
    }

    pub fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    pub fn language(&self) -> Language {
        self.context.language
    }

    /// Remote plan this session writes to, once one exists.
    pub fn plan_id(&self) -> Option<u64> {
        self.autosaver.plan_id()
    }

    /// Overall completeness, 0..=100.
    pub fn progress(&self) -> u8 {
        calculate_progress(&self.data)
    }

    pub fn step_completeness(&self, step: u8) -> u8 {
        step_completeness(step, &self.data)
    }

    pub fn validate_current_step(&self) -> ValidationResult {
        validate_step(self.current_step, &self.data)
    }

    pub fn save_status(&self) -> SaveStatus {
        SaveStatus {
            plan_id: self.autosaver.plan_id(),
            version_number: self.autosaver.version_number(),
            is_saving: self.autosaver.is_saving(),
            has_pending: self.autosaver.has_pending(),
            last_saved: self.autosaver.last_saved(),
            last_error: self.autosaver.last_error(),
        }
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Merges an edit into the working data and schedules an auto-save.
    ///
    /// Returns `false` without touching anything in review mode or when the
    /// update is empty. Must be called from within a Tokio runtime.
    pub fn update_data(&mut self, update: WizardUpdate) -> bool {
        if self.mode.is_read_only() {
            log::debug!("Ignoring edit in review mode");
            return false;
        }
        if update.is_empty() {
            return false;
        }
        self.data.apply(update);
        self.autosaver.schedule(self.data.clone(), self.current_step);
        true
    }

    /// Validates the current step and, if it passes, marks it completed and
    /// moves forward. On the last step only the completion is recorded.
    pub fn handle_next(&mut self) -> bool {
        let result = validate_step(self.current_step, &self.data);
        if !result.is_valid {
            for error in &result.errors {
                self.notify(NoticeLevel::Error, error.message.clone());
            }
            return false;
        }

        self.completed_steps.insert(self.current_step);
        if self.current_step < LAST_STEP {
            self.current_step += 1;
        }
        if !self.mode.is_read_only() {
            self.autosaver.schedule(self.data.clone(), self.current_step);
        }
        true
    }

    /// Moves one step back; a no-op on the first step.
    pub fn handle_back(&mut self) -> bool {
        if self.current_step > FIRST_STEP {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps straight to a step without validating the one being left.
    pub fn go_to_step(&mut self, step: u8) -> Result<()> {
        step_info(step)?;
        self.current_step = step;
        Ok(())
    }

    /// Saves the working data now, bypassing the debounce window.
    pub async fn save_draft(&mut self) -> Result<SaveReceipt> {
        if self.mode.is_read_only() {
            return Err(CompassError::ReadOnly);
        }
        match self
            .autosaver
            .save_now(self.data.clone(), self.current_step)
            .await
        {
            Ok(receipt) => {
                self.notify(NoticeLevel::Success, "Draft saved");
                Ok(receipt)
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not save draft: {e}"));
                Err(e)
            }
        }
    }

    /// Writes any pending auto-save immediately, e.g. before closing.
    pub async fn flush(&self) -> Result<Option<SaveReceipt>> {
        self.autosaver.flush().await
    }

    /// Checks the whole plan and commits it for approval.
    ///
    /// Blocking errors are queued as notices and returned in
    /// [`CompassError::SubmissionBlocked`]. Edit-mode submissions bump the
    /// plan's version.
    pub async fn submit(&mut self) -> Result<Plan> {
        if self.mode.is_read_only() {
            return Err(CompassError::ReadOnly);
        }

        let result = validate_submission(&self.data);
        if !result.is_valid {
            for error in &result.errors {
                self.notify(NoticeLevel::Error, error.message.clone());
            }
            return Err(CompassError::SubmissionBlocked {
                errors: result.messages(),
            });
        }

        let bump_version = self.mode == WizardMode::Edit;
        match self
            .autosaver
            .commit(self.data.clone(), self.current_step, bump_version)
            .await
        {
            Ok(plan) => {
                self.completed_steps.insert(self.current_step);
                self.notify(NoticeLevel::Success, "Plan submitted for approval");
                Ok(plan)
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not submit plan: {e}"));
                Err(e)
            }
        }
    }

    /// Loads the pending local draft into the session.
    ///
    /// Returns `false` when there is nothing to recover. If the draft belongs
    /// to a plan that still exists, later saves go to that plan.
    pub async fn recover_local_draft(&mut self) -> Result<bool> {
        if self.mode.is_read_only() {
            return Err(CompassError::ReadOnly);
        }
        let Some(draft) = self.autosaver.load_local_draft()? else {
            self.hydration = Hydration::Fresh;
            return Ok(false);
        };

        let mut plan_id = None;
        if let Some(id) = draft.plan_id {
            match self.context.backend.get_live_plan(id).await {
                Ok(plan) => {
                    self.load_plan(&plan);
                    self.mode = WizardMode::Edit;
                    plan_id = Some(id);
                }
                Err(CompassError::PlanNotFound { .. }) => {
                    log::warn!("Plan {id} of the local draft no longer exists");
                    self.bind_new_plan();
                }
                Err(e) => return Err(e),
            }
        }

        self.data = draft.data;
        self.current_step = clamp_step(draft.step);
        self.hydration = Hydration::Recovered { plan_id };
        self.autosaver.schedule(self.data.clone(), self.current_step);
        self.notify(NoticeLevel::Success, "Recovered unsaved draft");
        Ok(true)
    }

    /// Deletes the local draft without loading it.
    pub fn discard_local_draft(&mut self) -> Result<()> {
        self.autosaver.clear_local_draft()?;
        if self.hydration.recovery_pending() {
            self.hydration = Hydration::Fresh;
        }
        Ok(())
    }
}

fn clamp_step(step: u8) -> u8 {
    step.clamp(FIRST_STEP, LAST_STEP)
}
