//! Sound identifiers and on-disk candidate probing.
//!
//! Each ambient sound has an ordered list of file extensions. For a sound
//! `rain` the library looks for `rain.flac`, `rain.aiff`, `rain.wav` in the
//! sound directory, in that order, and keeps only candidates that exist,
//! can be opened, and are large enough to plausibly hold audio.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::synth::Waveform;

/// Candidates smaller than this are skipped for ambient playback.
pub const MIN_AMBIENT_FILE_BYTES: u64 = 1024;

/// Candidates smaller than this are skipped for the notification chime.
pub const MIN_NOTIFICATION_FILE_BYTES: u64 = 10 * 1024;

/// File stem of the notification chime.
pub const NOTIFICATION_SOUND_NAME: &str = "notification";

/// Extensions probed for the notification chime, in order.
pub const NOTIFICATION_EXTENSIONS: &[&str] = &["mp3", "flac", "aiff", "wav"];

const RAIN_EXTENSIONS: &[&str] = &["flac", "aiff", "wav"];
const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "flac", "aiff", "wav"];

// ============================================================================
// BackgroundSound
// ============================================================================

/// An ambient background sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSound {
    #[default]
    Rain,
    Ocean,
    Forest,
    Cafe,
    #[value(alias = "white_noise")]
    WhiteNoise,
}

impl BackgroundSound {
    /// All sounds, in display order.
    pub const ALL: [BackgroundSound; 5] = [
        BackgroundSound::Rain,
        BackgroundSound::Ocean,
        BackgroundSound::Forest,
        BackgroundSound::Cafe,
        BackgroundSound::WhiteNoise,
    ];

    /// Identifier, also the file stem of the sound's audio files.
    pub fn id(&self) -> &'static str {
        match self {
            BackgroundSound::Rain => "rain",
            BackgroundSound::Ocean => "ocean",
            BackgroundSound::Forest => "forest",
            BackgroundSound::Cafe => "cafe",
            BackgroundSound::WhiteNoise => "white_noise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BackgroundSound::Rain => "Rain",
            BackgroundSound::Ocean => "Ocean Waves",
            BackgroundSound::Forest => "Forest",
            BackgroundSound::Cafe => "Cafe Ambience",
            BackgroundSound::WhiteNoise => "White Noise",
        }
    }

    /// Parses an identifier as returned by [`BackgroundSound::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Frequency of the fallback tone, in Hz.
    pub fn frequency(&self) -> f32 {
        match self {
            BackgroundSound::Rain => 500.0,
            BackgroundSound::Ocean => 300.0,
            BackgroundSound::Forest => 800.0,
            BackgroundSound::Cafe => 400.0,
            BackgroundSound::WhiteNoise => 1000.0,
        }
    }

    /// File extensions to probe, in order of preference.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            BackgroundSound::Rain => RAIN_EXTENSIONS,
            _ => DEFAULT_EXTENSIONS,
        }
    }

    /// Waveform synthesized when no file can be played.
    pub fn fallback_waveform(&self) -> Waveform {
        match self {
            BackgroundSound::WhiteNoise => Waveform::WhiteNoise,
            other => Waveform::Sine {
                frequency: other.frequency(),
            },
        }
    }
}

impl std::fmt::Display for BackgroundSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Candidate probing
// ============================================================================

/// Result of probing one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateStatus {
    /// No file at the path.
    Missing,
    /// The path exists but cannot be opened as a regular file.
    Unreadable(String),
    /// The file is below the size threshold.
    TooSmall {
        /// Actual size in bytes.
        bytes: u64,
    },
    /// The file passed every check.
    Acceptable {
        /// Size in bytes.
        bytes: u64,
    },
}

impl CandidateStatus {
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Acceptable { .. })
    }
}

/// A probed candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub status: CandidateStatus,
}

/// Probes a single path.
pub fn probe(path: &Path, min_bytes: u64) -> CandidateStatus {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return CandidateStatus::Missing,
        Err(e) => return CandidateStatus::Unreadable(e.to_string()),
    };

    if !metadata.is_file() {
        return CandidateStatus::Unreadable("not a regular file".to_string());
    }

    if let Err(e) = File::open(path) {
        return CandidateStatus::Unreadable(e.to_string());
    }

    let bytes = metadata.len();
    if bytes < min_bytes {
        CandidateStatus::TooSmall { bytes }
    } else {
        CandidateStatus::Acceptable { bytes }
    }
}

/// A directory of sound files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundLibrary {
    dir: PathBuf,
}

impl SoundLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory probed for sound files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Probes every candidate for a file stem, in extension order.
    pub fn inspect_named(&self, stem: &str, extensions: &[&str], min_bytes: u64) -> Vec<Candidate> {
        extensions
            .iter()
            .map(|ext| {
                let path = self.dir.join(format!("{}.{}", stem, ext));
                let status = probe(&path, min_bytes);
                Candidate { path, status }
            })
            .collect()
    }

    /// Probes every candidate for an ambient sound.
    pub fn inspect(&self, sound: BackgroundSound) -> Vec<Candidate> {
        self.inspect_named(sound.id(), sound.extensions(), MIN_AMBIENT_FILE_BYTES)
    }

    /// Acceptable files for an ambient sound, in preference order.
    pub fn ambient_candidates(&self, sound: BackgroundSound) -> Vec<PathBuf> {
        accepted(self.inspect(sound))
    }

    /// Acceptable files for the notification chime, in preference order.
    pub fn notification_candidates(&self) -> Vec<PathBuf> {
        accepted(self.inspect_named(
            NOTIFICATION_SOUND_NAME,
            NOTIFICATION_EXTENSIONS,
            MIN_NOTIFICATION_FILE_BYTES,
        ))
    }
}

fn accepted(candidates: Vec<Candidate>) -> Vec<PathBuf> {
    candidates
        .into_iter()
        .filter_map(|candidate| match candidate.status {
            CandidateStatus::Acceptable { .. } => Some(candidate.path),
            status => {
                debug!("Skipping {}: {:?}", candidate.path.display(), status);
                None
            }
        })
        .collect()
}
