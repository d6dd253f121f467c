//! Boolean feature toggles.
//!
//! Each toggle is persisted under its own flat key so that a single
//! corrupt entry never resets the others.

use clap::ValueEnum;
use tracing::debug;

use crate::store::{load_bool, save_value, KeyValueStore};

/// A single feature toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Setting {
    /// Keep counting into a break when a focus session ends
    AutoStartBreak,
    /// Keep counting into a focus session when a break ends
    AutoStartWork,
    /// Remind about the upcoming long break
    LongBreakReminder,
    /// Record completed focus sessions in the statistics
    StatisticsTracking,
    /// Notify when a session starts
    StartNotification,
    /// Notify when a session completes
    CompleteNotification,
    /// Play the notification chime when a session completes
    SoundReminder,
}

impl Setting {
    /// All toggles, in display order.
    pub const ALL: [Setting; 7] = [
        Setting::AutoStartBreak,
        Setting::AutoStartWork,
        Setting::LongBreakReminder,
        Setting::StatisticsTracking,
        Setting::StartNotification,
        Setting::CompleteNotification,
        Setting::SoundReminder,
    ];

    /// Store key for this toggle.
    pub fn key(&self) -> &'static str {
        match self {
            Setting::AutoStartBreak => "auto_start_break",
            Setting::AutoStartWork => "auto_start_work",
            Setting::LongBreakReminder => "long_break_reminder",
            Setting::StatisticsTracking => "statistics_tracking",
            Setting::StartNotification => "start_notification",
            Setting::CompleteNotification => "complete_notification",
            Setting::SoundReminder => "sound_reminder",
        }
    }

    /// Value used when the toggle was never set.
    pub fn default_value(&self) -> bool {
        !matches!(self, Setting::AutoStartBreak | Setting::AutoStartWork)
    }
}

/// The full set of feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub auto_start_break: bool,
    pub auto_start_work: bool,
    pub long_break_reminder: bool,
    pub statistics_tracking: bool,
    pub start_notification: bool,
    pub complete_notification: bool,
    pub sound_reminder: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_start_break: false,
            auto_start_work: false,
            long_break_reminder: true,
            statistics_tracking: true,
            start_notification: true,
            complete_notification: true,
            sound_reminder: true,
        }
    }
}

impl Settings {
    /// Loads every toggle, falling back to its default.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Self::default();
        for setting in Setting::ALL {
            let value = load_bool(store, setting.key(), setting.default_value());
            *settings.slot(setting) = value;
        }
        settings
    }

    /// Returns the value of a toggle.
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::AutoStartBreak => self.auto_start_break,
            Setting::AutoStartWork => self.auto_start_work,
            Setting::LongBreakReminder => self.long_break_reminder,
            Setting::StatisticsTracking => self.statistics_tracking,
            Setting::StartNotification => self.start_notification,
            Setting::CompleteNotification => self.complete_notification,
            Setting::SoundReminder => self.sound_reminder,
        }
    }

    /// Updates a toggle and persists it.
    pub fn set(&mut self, store: &dyn KeyValueStore, setting: Setting, value: bool) {
        *self.slot(setting) = value;
        save_value(store, setting.key(), &value);
        debug!("Setting {} = {}", setting.key(), value);
    }

    fn slot(&mut self, setting: Setting) -> &mut bool {
        match setting {
            Setting::AutoStartBreak => &mut self.auto_start_break,
            Setting::AutoStartWork => &mut self.auto_start_work,
            Setting::LongBreakReminder => &mut self.long_break_reminder,
            Setting::StatisticsTracking => &mut self.statistics_tracking,
            Setting::StartNotification => &mut self.start_notification,
            Setting::CompleteNotification => &mut self.complete_notification,
            Setting::SoundReminder => &mut self.sound_reminder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_match_setting_defaults() {
        let settings = Settings::default();
        for setting in Setting::ALL {
            assert_eq!(settings.get(setting), setting.default_value(), "{:?}", setting);
        }
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_set_persists() {
        let store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        settings.set(&store, Setting::AutoStartBreak, true);
        settings.set(&store, Setting::SoundReminder, false);

        let reloaded = Settings::load(&store);
        assert!(reloaded.auto_start_break);
        assert!(!reloaded.sound_reminder);
        assert!(reloaded.statistics_tracking);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = Setting::ALL.iter().map(Setting::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Setting::ALL.len());
    }
}
