//! Ambient sound selection and playback.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::output::AudioOutput;
use super::source::{BackgroundSound, SoundLibrary};
use super::synth::{notification_chime, synthesize_loop, Waveform};

/// Default ambient volume.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Pause after releasing an output before acquiring the next one.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Additional pause when switching to a different sound.
pub const SWITCH_DELAY: Duration = Duration::from_millis(100);

/// What the player is currently looping.
#[derive(Debug, Clone, PartialEq)]
pub enum Playback {
    /// A sound file decoded from disk.
    File { sound: BackgroundSound, path: PathBuf },
    /// A generated fallback buffer.
    Synthesized {
        sound: BackgroundSound,
        waveform: Waveform,
    },
}

impl Playback {
    pub fn sound(&self) -> BackgroundSound {
        match self {
            Playback::File { sound, .. } | Playback::Synthesized { sound, .. } => *sound,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Playback::Synthesized { .. })
    }
}

/// How the notification chime was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationChime {
    File(PathBuf),
    Synthesized,
    /// The output rejected every attempt.
    Unavailable,
}

/// Loops one ambient sound at a time on an [`AudioOutput`].
///
/// Candidates come from a [`SoundLibrary`]. A candidate that fails to
/// decode is skipped in favour of the next one; when none is left the
/// sound's fallback waveform is synthesized, so after [`AmbientPlayer::play`]
/// a playback is always recorded.
pub struct AmbientPlayer<O: AudioOutput> {
    output: O,
    library: SoundLibrary,
    selected: BackgroundSound,
    volume: f32,
    active: Option<Playback>,
    settle_delay: Duration,
    switch_delay: Duration,
}

impl<O: AudioOutput> AmbientPlayer<O> {
    pub fn new(output: O, library: SoundLibrary, sound: BackgroundSound) -> Self {
        Self {
            output,
            library,
            selected: sound,
            volume: DEFAULT_VOLUME,
            active: None,
            settle_delay: SETTLE_DELAY,
            switch_delay: SWITCH_DELAY,
        }
    }

    /// Overrides both settling delays.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self.switch_delay = delay;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Starts looping the selected sound, replacing any current loop.
    pub fn play(&mut self) {
        if self.active.is_some() {
            self.stop();
        }

        let sound = self.selected;
        for path in self.library.ambient_candidates(sound) {
            match self.output.start_file_loop(&path, self.volume) {
                Ok(()) => {
                    info!("Playing {} from {}", sound.id(), path.display());
                    self.active = Some(Playback::File { sound, path });
                    return;
                }
                Err(e) if e.is_device_error() => {
                    warn!("Audio device failed: {}", e);
                    break;
                }
                Err(e) => warn!("Skipping candidate: {}", e),
            }
        }

        let waveform = sound.fallback_waveform();
        self.start_synthesized(sound, waveform);
    }

    fn start_synthesized(&mut self, sound: BackgroundSound, waveform: Waveform) {
        let buffer = synthesize_loop(waveform, self.volume);
        if let Err(e) = self.output.start_buffer_loop(&buffer) {
            warn!("Synthesized {} failed to start: {}", sound.id(), e);
        } else {
            info!("Playing synthesized {} ({:?})", sound.id(), waveform);
        }
        self.active = Some(Playback::Synthesized { sound, waveform });
    }

    /// Stops the current loop and waits for the output to settle.
    pub fn stop(&mut self) {
        self.output.stop();
        self.active = None;
        thread::sleep(self.settle_delay);
    }

    /// Selects a different sound, restarting playback if it was playing.
    pub fn select_sound(&mut self, sound: BackgroundSound) {
        if sound == self.selected {
            return;
        }
        debug!("Switching sound {} -> {}", self.selected.id(), sound.id());
        self.selected = sound;

        if self.active.is_some() {
            self.stop();
            thread::sleep(self.switch_delay);
            self.play();
        }
    }

    /// Changes the volume, clamped to [0, 1].
    ///
    /// A file loop is adjusted in place. A synthesized loop has its gain
    /// baked in, so it is regenerated and restarted.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);

        match self.active.clone() {
            Some(Playback::File { .. }) => self.output.set_volume(self.volume),
            Some(Playback::Synthesized { sound, waveform }) => {
                self.stop();
                self.start_synthesized(sound, waveform);
            }
            None => {}
        }
    }

    /// Plays the completion chime once, alongside any ambient loop.
    pub fn play_notification_sound(&mut self) -> NotificationChime {
        for path in self.library.notification_candidates() {
            match self.output.play_file_once(&path, 1.0) {
                Ok(()) => return NotificationChime::File(path),
                Err(e) => warn!("Cannot play {}: {}", path.display(), e),
            }
        }

        match self.output.play_buffer_once(&notification_chime()) {
            Ok(()) => NotificationChime::Synthesized,
            Err(e) => {
                warn!("Notification chime failed: {}", e);
                NotificationChime::Unavailable
            }
        }
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.active.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn selected(&self) -> BackgroundSound {
        self.selected
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: AudioOutput> std::fmt::Debug for AmbientPlayer<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientPlayer")
            .field("selected", &self.selected)
            .field("volume", &self.volume)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
