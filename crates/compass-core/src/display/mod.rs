//! Markdown formatting of models and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes get newtype wrappers so each context
//! can pick its own layout.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Format Wrappers │    │   Formatted     │
//! │ (Plan, Summary) │───▶│ & Result Types  │───▶│    Markdown     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`PlanSummaries`], [`StepTable`]
//! - [`results`]: create, update, submit, save, delete and restore outcomes,
//!   plus the [`ProgressReport`]
//! - [`status`]: [`OperationStatus`] and wizard [`Notices`]
//! - [`datetime`]: [`LocalDateTime`]
//!
//! ```rust
//! use compass_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Local draft discarded");
//! assert_eq!(status.to_string(), "Success: Local draft discarded\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{PlanSummaries, StepTable};
pub use datetime::LocalDateTime;
pub use results::{
    CreateResult, DeleteResult, ProgressReport, RestoreResult, SaveResult, SubmitResult,
    UpdateResult,
};
pub use status::{Notices, OperationStatus};
