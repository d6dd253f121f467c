//! Configuration error types.

use thiserror::Error;

use crate::types::TimerMode;

/// Errors returned by configuration operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration is outside the allowed range for its mode.
    #[error("{mode} duration must be between {min} and {max} minutes (got {minutes})")]
    InvalidDuration {
        /// Mode whose duration was rejected.
        mode: TimerMode,
        /// Rejected value.
        minutes: u32,
        /// Smallest allowed value.
        min: u32,
        /// Largest allowed value.
        max: u32,
    },

    /// A configuration name was empty or blank.
    #[error("configuration name must not be empty")]
    EmptyName,

    /// No configuration matched the given id or name.
    #[error("configuration not found: {0}")]
    NotFound(String),

    /// Built-in presets cannot be deleted.
    #[error("built-in preset '{0}' cannot be deleted")]
    PresetReadOnly(String),
}

impl ConfigError {
    /// Returns a suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "focus accepts 1-120 minutes, breaks accept 1-60 minutes",
            Self::EmptyName => "choose a non-empty name",
            Self::NotFound(_) => "run `tomato-focus config list` to see available configurations",
            Self::PresetReadOnly(_) => "duplicate the preset and edit the copy instead",
        }
    }
}
