#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use compass_core::{
    ai::{CompletionRequest, CompletionResponse, CompletionService},
    models::{Kpi, Objective, Plan, PlanFilter, WizardData},
    params::{CreatePlan, UpdatePlan},
    AutoSaveConfig, CompassError, MemoryDraftStore, PlanBackend, PlanStore, PlanStoreBuilder,
    Result, WizardContext,
};
use jiff::Timestamp;
use tempfile::TempDir;
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Helper function to create a test store
pub async fn create_test_store() -> (TempDir, PlanStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = PlanStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// In-memory backend that counts writes and can be switched to fail or to
/// hold writes open.
#[derive(Default)]
pub struct RecordingBackend {
    plans: Mutex<Vec<Plan>>,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    failing: AtomicBool,
    /// Writes wait for a read guard; `hold_writes` takes the write side
    gate: RwLock<()>,
    /// Every update in call order
    pub update_log: Mutex<Vec<UpdatePlan>>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Keeps every write that starts from completing until the guard drops.
    /// Writes are counted as soon as they start.
    pub fn hold_writes(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.try_write().expect("writes are already held")
    }

    pub fn writes(&self) -> usize {
        self.creates.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
    }

    pub fn plan(&self, id: u64) -> Option<Plan> {
        self.plans.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn last_update(&self) -> Option<UpdatePlan> {
        self.update_log.lock().unwrap().last().cloned()
    }

    /// Seeds a stored plan or template directly.
    pub fn insert(&self, data: WizardData, is_template: bool) -> Plan {
        let mut plans = self.plans.lock().unwrap();
        let now = Timestamp::now();
        let plan = Plan {
            id: plans.len() as u64 + 1,
            owner_id: Some("seed".to_string()),
            status: Default::default(),
            approval_status: Default::default(),
            version_number: 1,
            last_saved_step: 1,
            is_template,
            is_public: is_template,
            is_deleted: false,
            deleted_at: None,
            data,
            draft_data: None,
            created_at: now,
            updated_at: now,
            submitted_at: None,
        };
        plans.push(plan.clone());
        plan
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CompassError::database("backend unavailable")
                .with_source(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

#[async_trait]
impl PlanBackend for RecordingBackend {
    async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let _open = self.gate.read().await;
        self.check_failing()?;
        let mut plans = self.plans.lock().unwrap();
        let now = Timestamp::now();
        let plan = Plan {
            id: plans.len() as u64 + 1,
            owner_id: params.owner_id.clone(),
            status: params.status,
            approval_status: params.approval_status,
            version_number: 1,
            last_saved_step: params.last_saved_step,
            is_template: params.is_template,
            is_public: params.is_public,
            is_deleted: false,
            deleted_at: None,
            data: params.data.clone(),
            draft_data: params.draft_data.clone(),
            created_at: now,
            updated_at: now,
            submitted_at: params.submitted.then_some(now),
        };
        plans.push(plan.clone());
        Ok(plan)
    }

    async fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        Ok(self.plan(id))
    }

    async fn update_plan(&self, params: &UpdatePlan) -> Result<Plan> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.update_log.lock().unwrap().push(params.clone());
        let _open = self.gate.read().await;
        self.check_failing()?;
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.id == params.id && !p.is_deleted)
            .ok_or(CompassError::PlanNotFound { id: params.id })?;
        let now = Timestamp::now();
        if let Some(ref data) = params.data {
            plan.data = data.clone();
        }
        if let Some(ref draft) = params.draft_data {
            plan.draft_data = draft.clone();
        }
        if let Some(step) = params.last_saved_step {
            plan.last_saved_step = step;
        }
        if let Some(status) = params.status {
            plan.status = status;
        }
        if let Some(approval) = params.approval_status {
            plan.approval_status = approval;
        }
        if params.bump_version {
            plan.version_number += 1;
        }
        if params.mark_submitted {
            plan.submitted_at = Some(now);
        }
        plan.updated_at = now;
        Ok(plan.clone())
    }

    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<Plan>> {
        let plans = self.plans.lock().unwrap();
        Ok(plans
            .iter()
            .filter(|p| filter.include_deleted || !p.is_deleted)
            .filter(|p| filter.is_template.map_or(true, |t| p.is_template == t))
            .cloned()
            .collect())
    }

    async fn soft_delete_plan(&self, id: u64) -> Result<Plan> {
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CompassError::PlanNotFound { id })?;
        plan.is_deleted = true;
        plan.deleted_at = Some(Timestamp::now());
        Ok(plan.clone())
    }

    async fn restore_plan(&self, id: u64) -> Result<Plan> {
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CompassError::PlanNotFound { id })?;
        plan.is_deleted = false;
        plan.deleted_at = None;
        Ok(plan.clone())
    }
}

/// Completion service answering every request with a fixed response.
pub struct FixedCompletion {
    response: Mutex<Result<CompletionResponse>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FixedCompletion {
    pub fn new(response: Result<CompletionResponse>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionService for FixedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        match &*self.response.lock().unwrap() {
            Ok(response) => Ok(response.clone()),
            Err(e) => Err(CompassError::ai(e.to_string())),
        }
    }
}

/// Wizard context over a recording backend and an in-memory draft slot.
pub fn test_context(backend: &Arc<RecordingBackend>) -> (WizardContext, Arc<MemoryDraftStore>) {
    let drafts = Arc::new(MemoryDraftStore::new());
    let context = WizardContext::new(backend.clone(), drafts.clone())
        .with_user("planner@municipality.gov")
        .with_autosave(AutoSaveConfig::default());
    (context, drafts)
}

/// Plan content that clears the submission gate.
pub fn submittable_data(objectives: usize, kpis: usize) -> WizardData {
    WizardData {
        name_en: "Smart City 2030".to_string(),
        description_en: "Digital municipal services".to_string(),
        vision_en: "A leading smart city".to_string(),
        mission_en: "Serve residents digitally".to_string(),
        objectives: (1..=objectives)
            .map(|i| Objective {
                name_en: format!("Objective {i}"),
                ..Default::default()
            })
            .collect(),
        kpis: (1..=kpis)
            .map(|i| Kpi {
                name_en: format!("KPI {i}"),
                unit: "%".to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
