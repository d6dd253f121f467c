//! Services shared by every command.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ConfigurationStore, Settings};
use crate::sound::SoundLibrary;
use crate::stats::StatisticsStore;
use crate::store::{AppPaths, JsonFileStore, KeyValueStore, StoreError};
use crate::theme::ThemeManager;

/// Opened application state: resolved directories and the backing store.
///
/// Each accessor builds a fresh service over the same store, so commands
/// only load what they use.
#[derive(Debug, Clone)]
pub struct App {
    paths: AppPaths,
    store: Arc<JsonFileStore>,
}

impl App {
    /// Opens the store under `paths.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if an existing store file cannot be read.
    pub fn open(paths: AppPaths) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(paths.store_file())?;
        debug!(
            "Data dir: {}, sound dir: {}",
            paths.data_dir.display(),
            paths.sound_dir.display()
        );
        Ok(Self {
            paths,
            store: Arc::new(store),
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn configurations(&self) -> ConfigurationStore {
        ConfigurationStore::load(self.store())
    }

    pub fn statistics(&self) -> Arc<StatisticsStore> {
        Arc::new(StatisticsStore::load(self.store()))
    }

    pub fn themes(&self) -> ThemeManager {
        ThemeManager::load(self.store())
    }

    pub fn settings(&self) -> Settings {
        Settings::load(self.store.as_ref())
    }

    pub fn sound_library(&self) -> SoundLibrary {
        SoundLibrary::new(&self.paths.sound_dir)
    }
}
