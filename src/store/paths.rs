//! Resolution of on-disk locations.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TOMATO_FOCUS_DATA_DIR";

/// Environment variable overriding the sound directory.
pub const SOUND_DIR_ENV: &str = "TOMATO_FOCUS_SOUND_DIR";

/// File name of the key-value store inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

const APP_DIR_NAME: &str = "tomato-focus";

/// Directories used by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory holding the key-value store.
    pub data_dir: PathBuf,
    /// Directory probed for ambient and notification sound files.
    pub sound_dir: PathBuf,
}

impl AppPaths {
    /// Resolves directories from explicit overrides, then environment
    /// variables, then the platform data directory.
    pub fn resolve(data_dir: Option<PathBuf>, sound_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let sound_dir = sound_dir
            .or_else(|| std::env::var_os(SOUND_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join("sounds"));

        Self {
            data_dir,
            sound_dir,
        }
    }

    /// Creates paths rooted at a single directory.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.to_path_buf(),
            sound_dir: root.join("sounds"),
        }
    }

    /// Path of the key-value store file.
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
