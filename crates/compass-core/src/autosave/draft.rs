//! The single local draft slot.
//!
//! The slot holds the latest unsaved snapshot so edits survive a crash or a
//! failed remote write. It is independent of the remote plan and is cleared
//! after a successful remote save or an explicit discard.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    config,
    error::{CompassError, Result},
    models::WizardData,
};

/// Snapshot kept in the local slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDraft {
    pub data: WizardData,
    pub step: u8,
    /// Remote plan the snapshot belongs to, if one exists yet
    pub plan_id: Option<u64>,
    pub saved_at: Timestamp,
}

impl LocalDraft {
    pub fn new(data: WizardData, step: u8, plan_id: Option<u64>) -> Self {
        Self {
            data,
            step,
            plan_id,
            saved_at: Timestamp::now(),
        }
    }
}

/// Storage for the local draft slot.
pub trait DraftStore: Send + Sync {
    fn load(&self) -> Result<Option<LocalDraft>>;
    fn save(&self, draft: &LocalDraft) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON file slot, by default `$XDG_DATA_HOME/compass/draft.json`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at the default XDG location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config::data_file("draft.json")?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fs_error(&self, source: io::Error) -> CompassError {
        CompassError::FileSystem {
            path: self.path.clone(),
            source,
        }
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<LocalDraft>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.fs_error(e)),
        };

        match serde_json::from_str::<LocalDraft>(&raw) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable local draft at {}: {e}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, draft: &LocalDraft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.fs_error(e))?;
        }
        // Write then rename so a crash never leaves a half-written slot
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(draft)?).map_err(|e| self.fs_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.fs_error(e))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.fs_error(e)),
        }
    }
}

/// In-process slot for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<LocalDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<LocalDraft>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<LocalDraft>> {
        Ok(self.slot().clone())
    }

    fn save(&self, draft: &LocalDraft) -> Result<()> {
        *self.slot() = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn draft(name: &str) -> LocalDraft {
        LocalDraft::new(
            WizardData {
                name_en: name.to_string(),
                ..Default::default()
            },
            3,
            Some(7),
        )
    }

    #[test]
    fn file_slot_round_trips_and_clears() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path().join("nested").join("draft.json"));
        assert!(store.load().unwrap().is_none());

        store.save(&draft("First")).unwrap();
        store.save(&draft("Second")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.data.name_en, "Second");
        assert_eq!(loaded.step, 3);
        assert_eq!(loaded.plan_id, Some(7));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        fs::write(&path, "{not json").unwrap();
        assert!(FileDraftStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn memory_slot_holds_one_draft() {
        let store = MemoryDraftStore::new();
        store.save(&draft("A")).unwrap();
        store.save(&draft("B")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().data.name_en, "B");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
