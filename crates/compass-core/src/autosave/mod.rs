//! Debounced auto-save of the wizard's working data.
//!
//! Every edit calls [`AutoSaver::schedule`], which stores the snapshot in a
//! single pending slot and arms a timer. A timer only flushes if no newer
//! edit arrived during its debounce window, so a burst of edits produces one
//! write carrying the latest data. Writes are serialized: at most one backend
//! call is in flight per saver.
//!
//! A flush first mirrors the snapshot into the local draft slot, then writes
//! it remotely. On success the local slot is cleared. On failure the snapshot
//! stays pending, the local copy is kept for recovery and a retry is armed one
//! debounce window later.

mod draft;

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use jiff::Timestamp;

pub use draft::{DraftStore, FileDraftStore, LocalDraft, MemoryDraftStore};

use crate::{
    config::AutoSaveConfig,
    error::{CompassError, Result},
    models::{ApprovalStatus, Plan, PlanStatus, SaveReceipt, WizardData},
    params::{CreatePlan, UpdatePlan},
    store::PlanBackend,
};

/// Remote plan the saver writes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveBinding {
    /// Existing plan; `None` creates one on the first write
    pub plan_id: Option<u64>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone)]
struct PendingWrite {
    data: WizardData,
    step: u8,
}

#[derive(Debug, Default)]
struct SaveState {
    pending: Option<PendingWrite>,
    /// Bumped by every schedule; timers compare against it
    generation: u64,
    /// Bumped by every rebind; stale responses compare against it
    epoch: u64,
    binding: SaveBinding,
    /// A backend write is running
    writing: bool,
    /// Explicit saves and commits waiting for or holding the write lock
    queued: usize,
    version_number: Option<u32>,
    last_receipt: Option<SaveReceipt>,
    last_error: Option<String>,
}

struct Shared {
    backend: Arc<dyn PlanBackend>,
    drafts: Arc<dyn DraftStore>,
    config: AutoSaveConfig,
    state: Mutex<SaveState>,
    write_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, SaveState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Flushes after one debounce window unless a newer schedule superseded
    /// `generation` in the meantime.
    fn arm(self: &Arc<Self>, generation: u64) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(shared.config.debounce).await;
            if shared.state().generation != generation {
                return;
            }
            // Failures are logged, recorded and re-armed in flush
            let _ = shared.flush().await;
        });
    }

    /// Puts a snapshot whose write failed back in the pending slot and arms
    /// a retry. Newer pending data and rebinds win over the failed snapshot.
    fn requeue(self: &Arc<Self>, state: &mut SaveState, pending: PendingWrite, epoch: u64) {
        if state.epoch != epoch || state.pending.is_some() {
            return;
        }
        state.pending = Some(pending);
        state.generation += 1;
        self.arm(state.generation);
    }

    fn save_local(&self, pending: &PendingWrite, plan_id: Option<u64>) {
        let local = LocalDraft::new(pending.data.clone(), pending.step, plan_id);
        if let Err(e) = self.drafts.save(&local) {
            log::warn!("Could not write local draft: {e}");
        }
    }

    async fn flush(self: &Arc<Self>) -> Result<Option<SaveReceipt>> {
        let _write = self.write_lock.lock().await;

        let (pending, binding, epoch) = {
            let mut state = self.state();
            let Some(pending) = state.pending.take() else {
                return Ok(None);
            };
            state.writing = true;
            (pending, state.binding.clone(), state.epoch)
        };

        self.save_local(&pending, binding.plan_id);
        let result = self.write(&pending, &binding).await;

        let mut state = self.state();
        state.writing = false;
        match result {
            Ok(plan) => {
                let receipt = SaveReceipt::from(&plan);
                if state.epoch == epoch {
                    state.binding.plan_id = Some(plan.id);
                    state.version_number = Some(plan.version_number);
                    state.last_receipt = Some(receipt);
                    state.last_error = None;
                    if state.pending.is_none() {
                        if let Err(e) = self.drafts.clear() {
                            log::warn!("Could not clear local draft: {e}");
                        }
                    }
                } else {
                    log::debug!("Discarding save receipt for plan {} after rebind", plan.id);
                }
                log::debug!("Auto-saved plan {} at step {}", plan.id, pending.step);
                Ok(Some(receipt))
            }
            Err(e) => {
                log::warn!("Auto-save failed, keeping changes pending: {e}");
                state.last_error = Some(e.to_string());
                self.requeue(&mut state, pending, epoch);
                Err(e)
            }
        }
    }

    /// Creates the plan on the first write, then writes the draft overlay.
    async fn write(&self, pending: &PendingWrite, binding: &SaveBinding) -> Result<Plan> {
        match binding.plan_id {
            Some(id) => {
                self.backend
                    .update_plan(&UpdatePlan {
                        id,
                        draft_data: Some(Some(pending.data.to_full_update())),
                        last_saved_step: Some(pending.step),
                        ..Default::default()
                    })
                    .await
            }
            None => {
                self.backend
                    .create_plan(&CreatePlan {
                        owner_id: binding.owner_id.clone(),
                        data: pending.data.clone(),
                        last_saved_step: pending.step,
                        status: PlanStatus::Draft,
                        approval_status: ApprovalStatus::Draft,
                        ..Default::default()
                    })
                    .await
            }
        }
    }
}

/// Marks an explicit save as in progress from the moment it is requested
/// until it resolves, including the time spent behind an in-flight write.
struct QueuedSave<'a>(&'a Shared);

impl<'a> QueuedSave<'a> {
    fn enter(shared: &'a Shared) -> Self {
        shared.state().queued += 1;
        Self(shared)
    }
}

impl Drop for QueuedSave<'_> {
    fn drop(&mut self) {
        self.0.state().queued -= 1;
    }
}

/// Debounced, serialized writer of wizard snapshots. Cheap to clone.
#[derive(Clone)]
pub struct AutoSaver {
    shared: Arc<Shared>,
}

impl fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state();
        f.debug_struct("AutoSaver")
            .field("binding", &state.binding)
            .field("has_pending", &state.pending.is_some())
            .field("is_saving", &(state.writing || state.queued > 0))
            .finish()
    }
}

impl AutoSaver {
    pub fn new(
        backend: Arc<dyn PlanBackend>,
        drafts: Arc<dyn DraftStore>,
        config: AutoSaveConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                drafts,
                config,
                state: Mutex::new(SaveState::default()),
                write_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Points subsequent writes at another plan.
    ///
    /// Pending data is dropped and receipts of writes already in flight no
    /// longer update the saver's metadata.
    pub fn bind(&self, binding: SaveBinding) {
        let mut state = self.shared.state();
        state.epoch += 1;
        state.generation += 1;
        state.pending = None;
        state.version_number = None;
        state.last_receipt = None;
        state.last_error = None;
        state.binding = binding;
    }

    /// Queues a snapshot and arms the debounce timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, data: WizardData, step: u8) {
        let generation = {
            let mut state = self.shared.state();
            state.generation += 1;
            state.pending = Some(PendingWrite { data, step });
            state.generation
        };

        self.shared.arm(generation);
    }

    /// Writes a snapshot immediately, bypassing the debounce window.
    pub async fn save_now(&self, data: WizardData, step: u8) -> Result<SaveReceipt> {
        let _queued = QueuedSave::enter(&self.shared);
        {
            let mut state = self.shared.state();
            state.generation += 1;
            state.pending = Some(PendingWrite { data, step });
        }
        match self.shared.flush().await? {
            Some(receipt) => Ok(receipt),
            // A timer that was already past its check wrote our snapshot
            None => self.last_receipt().ok_or_else(|| CompassError::Configuration {
                message: "save completed without a receipt".to_string(),
            }),
        }
    }

    /// Writes whatever is pending right now, if anything.
    pub async fn flush(&self) -> Result<Option<SaveReceipt>> {
        {
            let mut state = self.shared.state();
            state.generation += 1;
        }
        self.shared.flush().await
    }

    /// Drops pending data without writing it and disarms running timers.
    pub fn cancel_pending(&self) {
        let mut state = self.shared.state();
        state.generation += 1;
        state.pending = None;
    }

    /// Commits the final content of a plan: content replaces the committed
    /// data, the draft overlay is cleared and the plan is marked submitted.
    ///
    /// Runs under the same write lock as auto-saves, after any in-flight
    /// write has finished.
    ///
    /// Until the commit succeeds the content is mirrored in the local draft
    /// slot. A failed commit leaves it pending as a draft write with a retry
    /// armed, so no edits are lost.
    pub async fn commit(&self, data: WizardData, step: u8, bump_version: bool) -> Result<Plan> {
        let _queued = QueuedSave::enter(&self.shared);
        self.cancel_pending();
        let _write = self.shared.write_lock.lock().await;

        let (binding, epoch) = {
            let mut state = self.shared.state();
            state.writing = true;
            (state.binding.clone(), state.epoch)
        };

        let snapshot = PendingWrite { data, step };
        self.shared.save_local(&snapshot, binding.plan_id);

        let result = match binding.plan_id {
            Some(id) => {
                self.shared
                    .backend
                    .update_plan(&UpdatePlan {
                        id,
                        data: Some(snapshot.data.clone()),
                        draft_data: Some(None),
                        last_saved_step: Some(step),
                        status: Some(PlanStatus::Active),
                        approval_status: Some(ApprovalStatus::Pending),
                        bump_version,
                        mark_submitted: true,
                    })
                    .await
            }
            None => {
                self.shared
                    .backend
                    .create_plan(&CreatePlan {
                        owner_id: binding.owner_id.clone(),
                        data: snapshot.data.clone(),
                        last_saved_step: step,
                        status: PlanStatus::Active,
                        approval_status: ApprovalStatus::Pending,
                        submitted: true,
                        ..Default::default()
                    })
                    .await
            }
        };

        let mut state = self.shared.state();
        state.writing = false;
        match result {
            Ok(plan) => {
                if state.epoch == epoch {
                    state.binding.plan_id = Some(plan.id);
                    state.version_number = Some(plan.version_number);
                    state.last_receipt = Some(SaveReceipt::from(&plan));
                    state.last_error = None;
                }
                if let Err(e) = self.shared.drafts.clear() {
                    log::warn!("Could not clear local draft: {e}");
                }
                log::info!("Submitted plan {} (version {})", plan.id, plan.version_number);
                Ok(plan)
            }
            Err(e) => {
                log::warn!("Submission failed, keeping content as a pending draft: {e}");
                state.last_error = Some(e.to_string());
                self.shared.requeue(&mut state, snapshot, epoch);
                Err(e)
            }
        }
    }

    pub fn binding(&self) -> SaveBinding {
        self.shared.state().binding.clone()
    }

    pub fn plan_id(&self) -> Option<u64> {
        self.shared.state().binding.plan_id
    }

    pub fn version_number(&self) -> Option<u32> {
        self.shared.state().version_number
    }

    /// True from the moment a write is requested explicitly, or a debounced
    /// write starts, until it resolves.
    pub fn is_saving(&self) -> bool {
        let state = self.shared.state();
        state.writing || state.queued > 0
    }

    pub fn has_pending(&self) -> bool {
        self.shared.state().pending.is_some()
    }

    /// Time of the last successful write.
    pub fn last_saved(&self) -> Option<Timestamp> {
        self.shared.state().last_receipt.map(|r| r.updated_at)
    }

    pub fn last_receipt(&self) -> Option<SaveReceipt> {
        self.shared.state().last_receipt
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.state().last_error.clone()
    }

    pub fn load_local_draft(&self) -> Result<Option<LocalDraft>> {
        self.shared.drafts.load()
    }

    pub fn clear_local_draft(&self) -> Result<()> {
        self.shared.drafts.clear()
    }
}
