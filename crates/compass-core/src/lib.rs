//! Core library for the Compass strategic plan wizard.
//!
//! This crate holds the state machine behind the 18-step plan wizard: the
//! working plan data and its partial updates, step navigation and
//! validation, debounced draft auto-saving, AI-assisted content generation
//! and plan exports. Persistence and the AI service sit behind traits so any
//! interface (the bundled CLI, a test harness) can drive a session.
//!
//! # Architecture
//!
//! - **Models** ([`models`]): [`WizardData`] and its typed list items, the
//!   persisted [`Plan`] record and the fixed step table
//! - **Wizard** ([`wizard`]): one editing session with hydration, navigation,
//!   submission and user notices
//! - **Auto-save** ([`autosave`]): debounced remote writes plus a local draft
//!   slot for crash recovery
//! - **Validation** ([`validation`]): per-step rules, completeness scoring and
//!   the submission gate
//! - **AI** ([`ai`]): prompt and schema construction and response mapping
//! - **Export** ([`export`]): CSV workbook and markdown report
//! - **Store** ([`store`]): the [`PlanBackend`] boundary and its SQLite
//!   implementation
//! - **Display** ([`display`]): markdown formatting for terminal rendering
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use compass_core::{
//!     models::WizardUpdate, FileDraftStore, LaunchParams, PlanStoreBuilder, Wizard,
//!     WizardContext,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PlanStoreBuilder::new()
//!     .with_database_path(Some("plans.db"))
//!     .build()
//!     .await?;
//! let drafts = FileDraftStore::new("draft.json");
//! let context = WizardContext::new(Arc::new(store), Arc::new(drafts));
//!
//! let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await?;
//! wizard.update_data(WizardUpdate {
//!     name_en: Some("Smart City 2030".to_string()),
//!     description_en: Some("Digital services for residents".to_string()),
//!     ..Default::default()
//! });
//! wizard.handle_next();
//! wizard.flush().await?;
//!
//! println!("Progress: {}%", wizard.progress());
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod autosave;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod params;
pub mod store;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use ai::{CompletionRequest, CompletionResponse, CompletionService, HttpCompletionService};
pub use autosave::{AutoSaver, DraftStore, FileDraftStore, LocalDraft, MemoryDraftStore};
pub use config::{AiConfig, AutoSaveConfig};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, OperationStatus, PlanSummaries, StepTable, UpdateResult,
};
pub use error::{CompassError, Result};
pub use models::{
    Language, Plan, PlanFilter, PlanStatus, PlanSummary, WizardData, WizardUpdate, LAST_STEP,
    STEPS,
};
pub use params::{CreatePlan, Id, ListPlans, UpdatePlan};
pub use store::{PlanBackend, PlanStore, PlanStoreBuilder};
pub use validation::{validate_step, validate_submission, ValidationResult};
pub use wizard::{LaunchParams, Notice, NoticeLevel, Wizard, WizardContext, WizardMode};
