//! Sound system error types.
//!
//! None of these reach the user as hard failures: the ambient player logs
//! them and moves on to the next candidate or to synthesis.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by an audio output.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No default output device could be opened.
    #[error("no audio output device: {0}")]
    NoDevice(String),

    /// A sink could not be attached to the output stream.
    #[error("cannot create audio sink: {0}")]
    Sink(String),

    /// A candidate file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A candidate file opened but is not a supported audio format.
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}

impl SoundError {
    pub fn decode(path: &Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// True when the device itself failed, so every other candidate
    /// would fail the same way.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::NoDevice(_) | Self::Sink(_))
    }

    /// True when only this candidate file is at fault.
    #[must_use]
    pub fn is_candidate_error(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Decode { .. })
    }

    /// The file involved, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. } | Self::Decode { path, .. } => Some(path),
            Self::NoDevice(_) | Self::Sink(_) => None,
        }
    }
}
