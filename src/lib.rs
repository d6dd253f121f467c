//! Tomato Focus Library
//!
//! This library provides the core functionality for the tomato-focus CLI.
//! It includes:
//! - Timer engine cycling focus sessions and breaks
//! - Named timer configurations with read-only presets
//! - Ambient background sounds with synthesized fallbacks
//! - Desktop notifications on cycle start and completion
//! - Daily usage statistics and colour themes
//! - A JSON key-value store backing every persisted value

pub mod cli;
pub mod config;
pub mod notification;
pub mod sound;
pub mod stats;
pub mod store;
pub mod theme;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{TimerDurations, TimerMode, TimerState};

pub use config::{ConfigError, ConfigurationStore, Setting, Settings, TimerConfiguration};
pub use notification::{DesktopNotifier, MockNotifier, NotificationError, Notifier};
pub use sound::{AmbientPlayer, AudioOutput, BackgroundSound, SoundError, SoundLibrary};
pub use stats::{DailyStat, SessionRecorder, StatisticsStore};
pub use store::{AppPaths, JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use theme::{AppTheme, ThemeError, ThemeManager};
pub use timer::{EngineOptions, TimerEngine, TimerEvent};
