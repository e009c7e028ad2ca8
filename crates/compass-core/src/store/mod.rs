//! Asynchronous access to persisted plans.
//!
//! [`PlanBackend`] is the persistence boundary the wizard and auto-saver talk
//! to. [`PlanStore`] implements it over SQLite, running each blocking
//! database call on tokio's blocking pool.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ Wizard/AutoSaver│    │   PlanStore     │    │    Database     │
//! │  (PlanBackend)  │───▶│ (spawn_blocking)│───▶│   (rusqlite)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::task;

use crate::{
    db::Database,
    error::{CompassError, Result},
    models::{Plan, PlanFilter},
    params::{CreatePlan, UpdatePlan},
};

pub mod builder;

pub use builder::PlanStoreBuilder;

/// Remote table of plan records.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    /// Inserts a plan at version 1.
    async fn create_plan(&self, params: &CreatePlan) -> Result<Plan>;

    /// Fetches a plan by id, including soft-deleted ones.
    async fn get_plan(&self, id: u64) -> Result<Option<Plan>>;

    /// Updates a live plan by id.
    async fn update_plan(&self, params: &UpdatePlan) -> Result<Plan>;

    /// Lists plans matching `filter`.
    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<Plan>>;

    /// Sets the soft-delete flag and timestamp.
    async fn soft_delete_plan(&self, id: u64) -> Result<Plan>;

    /// Clears the soft-delete flag.
    async fn restore_plan(&self, id: u64) -> Result<Plan>;

    /// Fetches a live template by id.
    async fn get_template(&self, id: u64) -> Result<Plan> {
        match self.get_plan(id).await? {
            Some(plan) if plan.is_template && !plan.is_deleted => Ok(plan),
            _ => Err(CompassError::TemplateNotFound { id }),
        }
    }

    /// Fetches a live plan by id.
    async fn get_live_plan(&self, id: u64) -> Result<Plan> {
        match self.get_plan(id).await? {
            Some(plan) if !plan.is_deleted => Ok(plan),
            _ => Err(CompassError::PlanNotFound { id }),
        }
    }
}

/// SQLite-backed plan store.
#[derive(Debug, Clone)]
pub struct PlanStore {
    pub(crate) db_path: PathBuf,
}

impl PlanStore {
    /// Creates a store over an already-initialised database file.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the underlying database file.
    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    async fn with_db<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(CompassError::join)?
    }
}

#[async_trait]
impl PlanBackend for PlanStore {
    async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        let params = params.clone();
        self.with_db(move |db| db.create_plan(&params)).await
    }

    async fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        self.with_db(move |db| db.get_plan(id)).await
    }

    async fn update_plan(&self, params: &UpdatePlan) -> Result<Plan> {
        let params = params.clone();
        self.with_db(move |db| db.update_plan(&params)).await
    }

    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<Plan>> {
        let filter = filter.clone();
        self.with_db(move |db| db.list_plans(&filter)).await
    }

    async fn soft_delete_plan(&self, id: u64) -> Result<Plan> {
        log::info!("Soft-deleting plan {id}");
        self.with_db(move |db| db.soft_delete_plan(id)).await
    }

    async fn restore_plan(&self, id: u64) -> Result<Plan> {
        log::info!("Restoring plan {id}");
        self.with_db(move |db| db.restore_plan(id)).await
    }
}
