//! Builder for creating and configuring PlanStore instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::PlanStore;
use crate::{
    config,
    db::Database,
    error::{CompassError, Result},
};

/// Builder for creating and configuring PlanStore instances.
#[derive(Debug, Clone, Default)]
pub struct PlanStoreBuilder {
    database_path: Option<PathBuf>,
}

impl PlanStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/compass/compass.db` or `~/.local/share/compass/compass.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `CompassError::FileSystem` if the database path is invalid
    /// Returns `CompassError::Database` if database initialization fails
    pub async fn build(self) -> Result<PlanStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => config::data_file("compass.db")?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CompassError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), CompassError>(())
        })
        .await
        .map_err(CompassError::join)??;

        log::debug!("Plan store ready at {}", db_path.display());
        Ok(PlanStore::new(db_path))
    }
}
