//! Timer configurations.
//!
//! A configuration names a set of focus/break durations. Built-in presets
//! are read-only: editing one appends a derived user-defined copy and
//! selects it. User-defined configurations are edited in place.
//!
//! The configuration list and the selected configuration are persisted as
//! two JSON entries in the key-value store after every change.

mod error;
mod settings;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{load_value, save_value, KeyValueStore};
use crate::types::{TimerDurations, TimerMode};

pub use error::ConfigError;
pub use settings::{Setting, Settings};

/// Store key for the configuration list.
pub const CONFIGURATIONS_KEY: &str = "timer_configurations";

/// Store key for the selected configuration snapshot.
pub const SELECTED_CONFIGURATION_KEY: &str = "selected_timer_configuration";

/// Prefix of the name given to a configuration derived from a preset.
pub const DERIVED_NAME_PREFIX: &str = "Custom - ";

/// Suffix of the name given to a duplicated configuration.
pub const DUPLICATE_NAME_SUFFIX: &str = " Copy";

// ============================================================================
// TimerConfiguration
// ============================================================================

/// A named set of durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    /// Stable identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Focus duration in minutes (1-120)
    pub focus_minutes: u32,
    /// Short break duration in minutes (1-60)
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// False for built-in presets
    #[serde(default)]
    pub is_user_defined: bool,
}

impl TimerConfiguration {
    /// Creates a user-defined configuration with a fresh id.
    pub fn user_defined(name: impl Into<String>, durations: TimerDurations) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            focus_minutes: durations.focus_minutes,
            short_break_minutes: durations.short_break_minutes,
            long_break_minutes: durations.long_break_minutes,
            is_user_defined: true,
        }
    }

    /// Returns the durations of this configuration.
    pub fn durations(&self) -> TimerDurations {
        TimerDurations::new(
            self.focus_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
        )
    }

    fn set_minutes(&mut self, mode: TimerMode, minutes: u32) {
        match mode {
            TimerMode::Focus => self.focus_minutes = minutes,
            TimerMode::ShortBreak => self.short_break_minutes = minutes,
            TimerMode::LongBreak => self.long_break_minutes = minutes,
        }
    }

    /// Validates the durations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_durations(&self.durations())
    }
}

/// Checks a single duration against the range allowed for its mode.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDuration` if `minutes` is out of range.
pub fn validate_minutes(mode: TimerMode, minutes: u32) -> Result<(), ConfigError> {
    let (min, max) = match mode {
        TimerMode::Focus => (1, 120),
        TimerMode::ShortBreak | TimerMode::LongBreak => (1, 60),
    };
    if minutes < min || minutes > max {
        return Err(ConfigError::InvalidDuration {
            mode,
            minutes,
            min,
            max,
        });
    }
    Ok(())
}

/// Checks every duration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDuration` for the first out-of-range value.
pub fn validate_durations(durations: &TimerDurations) -> Result<(), ConfigError> {
    for mode in TimerMode::ALL {
        validate_minutes(mode, durations.minutes_for(mode))?;
    }
    Ok(())
}

/// Returns the built-in presets.
///
/// Preset ids are fixed so that a persisted selection survives a reset.
pub fn default_presets() -> Vec<TimerConfiguration> {
    const PRESETS: [(&str, u32, u32, u32); 7] = [
        ("Classic Pomodoro", 25, 5, 15),
        ("Developer Focus", 30, 5, 20),
        ("Deep Work", 45, 10, 25),
        ("Study Mode", 50, 10, 25),
        ("Creative Work", 30, 8, 20),
        ("Quick Sprint", 15, 3, 10),
        ("Relaxed Mode", 20, 10, 20),
    ];

    PRESETS
        .iter()
        .enumerate()
        .map(|(i, (name, focus, short, long))| TimerConfiguration {
            id: Uuid::from_u128(0x7f00_0000_0000_4000_8000_0000_0000_0001 + i as u128),
            name: (*name).to_string(),
            focus_minutes: *focus,
            short_break_minutes: *short,
            long_break_minutes: *long,
            is_user_defined: false,
        })
        .collect()
}

// ============================================================================
// ConfigurationStore
// ============================================================================

/// Owns the configuration list and the current selection.
pub struct ConfigurationStore {
    store: Arc<dyn KeyValueStore>,
    configurations: Vec<TimerConfiguration>,
    selected: TimerConfiguration,
}

impl ConfigurationStore {
    /// Loads configurations from the store, falling back to the presets.
    ///
    /// The persisted selection is matched by id against the loaded list;
    /// if it no longer exists the first configuration is selected.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let configurations = load_value::<Vec<TimerConfiguration>>(store.as_ref(), CONFIGURATIONS_KEY)
            .filter(|list| !list.is_empty())
            .unwrap_or_else(default_presets);

        let selected = load_value::<TimerConfiguration>(store.as_ref(), SELECTED_CONFIGURATION_KEY)
            .and_then(|snapshot| configurations.iter().find(|c| c.id == snapshot.id).cloned())
            .unwrap_or_else(|| configurations[0].clone());

        debug!(
            "Loaded {} configurations, selected '{}'",
            configurations.len(),
            selected.name
        );

        Self {
            store,
            configurations,
            selected,
        }
    }

    /// All configurations, presets first in their original order.
    pub fn configurations(&self) -> &[TimerConfiguration] {
        &self.configurations
    }

    /// The selected configuration.
    pub fn selected(&self) -> &TimerConfiguration {
        &self.selected
    }

    /// Durations of the selected configuration.
    pub fn durations(&self) -> TimerDurations {
        self.selected.durations()
    }

    /// Built-in presets.
    pub fn presets(&self) -> Vec<&TimerConfiguration> {
        self.configurations
            .iter()
            .filter(|c| !c.is_user_defined)
            .collect()
    }

    /// User-defined configurations.
    pub fn user_defined(&self) -> Vec<&TimerConfiguration> {
        self.configurations
            .iter()
            .filter(|c| c.is_user_defined)
            .collect()
    }

    /// Finds a configuration by exact name.
    pub fn by_name(&self, name: &str) -> Option<&TimerConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Finds a configuration by id, exact name, or case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&TimerConfiguration> {
        if let Ok(id) = Uuid::parse_str(query) {
            if let Some(config) = self.configurations.iter().find(|c| c.id == id) {
                return Some(config);
            }
        }
        self.by_name(query).or_else(|| {
            self.configurations
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(query))
        })
    }

    /// Returns true if a configuration with this exact name exists.
    pub fn name_exists(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// Selects the configuration matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if nothing matches.
    pub fn select(&mut self, query: &str) -> Result<&TimerConfiguration, ConfigError> {
        let config = self
            .find(query)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(query.to_string()))?;
        self.set_selected(config);
        Ok(&self.selected)
    }

    /// Appends a new user-defined configuration and selects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or a duration is out of range.
    pub fn add_custom(
        &mut self,
        name: &str,
        durations: TimerDurations,
    ) -> Result<&TimerConfiguration, ConfigError> {
        let name = validated_name(name)?;
        validate_durations(&durations)?;

        let config = TimerConfiguration::user_defined(name, durations);
        info!("Added configuration '{}'", config.name);
        self.configurations.push(config.clone());
        self.persist_configurations();
        self.set_selected(config);
        Ok(&self.selected)
    }

    /// Selects the configuration called `name`, creating it first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a new configuration would be invalid.
    pub fn add_quick_preset(
        &mut self,
        name: &str,
        durations: TimerDurations,
    ) -> Result<&TimerConfiguration, ConfigError> {
        if let Some(existing) = self.by_name(name).cloned() {
            self.set_selected(existing);
            return Ok(&self.selected);
        }
        self.add_custom(name, durations)
    }

    /// Deletes a user-defined configuration.
    ///
    /// If it was selected, the first remaining configuration is selected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown query and `PresetReadOnly` for a
    /// built-in preset.
    pub fn delete(&mut self, query: &str) -> Result<TimerConfiguration, ConfigError> {
        let target = self
            .find(query)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(query.to_string()))?;
        if !target.is_user_defined {
            return Err(ConfigError::PresetReadOnly(target.name));
        }

        self.configurations.retain(|c| c.id != target.id);
        if self.configurations.is_empty() {
            self.configurations = default_presets();
        }
        self.persist_configurations();

        if self.selected.id == target.id {
            let first = self.configurations[0].clone();
            self.set_selected(first);
        }

        info!("Deleted configuration '{}'", target.name);
        Ok(target)
    }

    /// Changes one duration of the selected configuration.
    ///
    /// A user-defined selection is edited in place. A preset selection is
    /// left untouched; a derived user-defined copy carrying the change is
    /// appended and selected instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` if `minutes` is out of range.
    pub fn update_minutes(
        &mut self,
        mode: TimerMode,
        minutes: u32,
    ) -> Result<&TimerConfiguration, ConfigError> {
        validate_minutes(mode, minutes)?;

        let mut updated = self.selected.clone();
        updated.set_minutes(mode, minutes);

        if self.selected.is_user_defined {
            if let Some(slot) = self.configurations.iter_mut().find(|c| c.id == updated.id) {
                *slot = updated.clone();
            }
            self.persist_configurations();
            self.set_selected(updated);
        } else {
            updated.id = Uuid::new_v4();
            updated.name = format!("{}{}", DERIVED_NAME_PREFIX, self.selected.name);
            updated.is_user_defined = true;
            debug!(
                "Preset '{}' is read-only, deriving '{}'",
                self.selected.name, updated.name
            );
            self.configurations.push(updated.clone());
            self.persist_configurations();
            self.set_selected(updated);
        }

        Ok(&self.selected)
    }

    /// Appends a user-defined copy of a configuration without selecting it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if nothing matches.
    pub fn duplicate(&mut self, query: &str) -> Result<&TimerConfiguration, ConfigError> {
        let source = self
            .find(query)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(query.to_string()))?;

        let copy = TimerConfiguration::user_defined(
            format!("{}{}", source.name, DUPLICATE_NAME_SUFFIX),
            source.durations(),
        );
        self.configurations.push(copy);
        self.persist_configurations();

        let last = self.configurations.len() - 1;
        Ok(&self.configurations[last])
    }

    /// Saves the selected durations under `name` and selects the result.
    ///
    /// An existing configuration with the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyName` for a blank name.
    pub fn save_current_as(&mut self, name: &str) -> Result<&TimerConfiguration, ConfigError> {
        let name = validated_name(name)?;
        let config = TimerConfiguration::user_defined(name, self.selected.durations());

        match self.configurations.iter().position(|c| c.name == config.name) {
            Some(index) => self.configurations[index] = config.clone(),
            None => self.configurations.push(config.clone()),
        }
        self.persist_configurations();
        self.set_selected(config);
        Ok(&self.selected)
    }

    /// Replaces every configuration with the built-in presets.
    pub fn reset_to_defaults(&mut self) {
        self.configurations = default_presets();
        self.persist_configurations();
        let first = self.configurations[0].clone();
        self.set_selected(first);
        info!("Configurations reset to defaults");
    }

    fn set_selected(&mut self, config: TimerConfiguration) {
        self.selected = config;
        save_value(self.store.as_ref(), SELECTED_CONFIGURATION_KEY, &self.selected);
    }

    fn persist_configurations(&self) {
        save_value(self.store.as_ref(), CONFIGURATIONS_KEY, &self.configurations);
    }
}

impl std::fmt::Debug for ConfigurationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationStore")
            .field("configurations", &self.configurations.len())
            .field("selected", &self.selected.name)
            .finish_non_exhaustive()
    }
}

fn validated_name(name: &str) -> Result<String, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyName);
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
