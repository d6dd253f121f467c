//! Ambient sound playback for focus sessions.
//!
//! This module provides:
//!
//! - Candidate probing of sound files by extension
//! - Looping playback through rodio
//! - Procedural fallback (sine tone or white noise)
//! - A one-shot notification chime
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │  AmbientPlayer   │────▶│   SoundLibrary   │  <id>.<ext> candidates
//! └────────┬─────────┘     └──────────────────┘
//!          │ file loop, or synthesized buffer on fallback
//!          ▼
//! ┌──────────────────┐
//! │   AudioOutput    │  RodioOutput / MockAudioOutput
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use tomato_focus::sound::{try_create_output, AmbientPlayer, BackgroundSound, SoundLibrary};
//!
//! if let Some(output) = try_create_output() {
//!     let library = SoundLibrary::new("/home/me/.local/share/tomato-focus/sounds");
//!     let mut player = AmbientPlayer::new(output, library, BackgroundSound::Rain);
//!     player.play();
//!     player.set_volume(0.3);
//! }
//! ```

mod error;
mod output;
mod player;
mod source;
mod synth;

pub use error::SoundError;
pub use output::{try_create_output, AudioOutput, MockAudioOutput, OutputCall, RodioOutput};
pub use player::{
    AmbientPlayer, NotificationChime, Playback, DEFAULT_VOLUME, SETTLE_DELAY, SWITCH_DELAY,
};
pub use source::{
    probe, BackgroundSound, Candidate, CandidateStatus, SoundLibrary, MIN_AMBIENT_FILE_BYTES,
    MIN_NOTIFICATION_FILE_BYTES, NOTIFICATION_EXTENSIONS, NOTIFICATION_SOUND_NAME,
};
pub use synth::{
    notification_chime, synthesize, synthesize_loop, SynthesizedBuffer, Waveform, LOOP_SECONDS,
    SAMPLE_RATE,
};
