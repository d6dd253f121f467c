//! Audio output backends.
//!
//! [`AudioOutput`] is the seam between the ambient player and the audio
//! device. [`RodioOutput`] drives a real device through rodio v0.20;
//! [`MockAudioOutput`] records calls for tests.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::synth::SynthesizedBuffer;

/// A device capable of looping ambient audio and playing one-shot sounds.
pub trait AudioOutput {
    /// Replaces any current loop with `path` decoded and repeated forever.
    fn start_file_loop(&mut self, path: &Path, volume: f32) -> Result<(), SoundError>;

    /// Replaces any current loop with `buffer` repeated forever.
    fn start_buffer_loop(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError>;

    /// Changes the volume of the current loop in place.
    fn set_volume(&mut self, volume: f32);

    /// Stops the current loop, if any.
    fn stop(&mut self);

    /// Plays `path` once, alongside any loop.
    fn play_file_once(&mut self, path: &Path, volume: f32) -> Result<(), SoundError>;

    /// Plays `buffer` once, alongside any loop.
    fn play_buffer_once(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError>;
}

// ============================================================================
// Rodio
// ============================================================================

/// Audio output on the default device.
pub struct RodioOutput {
    /// Must be kept alive for playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioOutput {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::NoDevice` if no audio output device is
    /// available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| SoundError::NoDevice(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.handle).map_err(|e| SoundError::Sink(e.to_string()))
    }

    fn open(path: &Path) -> Result<BufReader<File>, SoundError> {
        let file = File::open(path).map_err(|source| SoundError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(BufReader::new(file))
    }

    fn samples(buffer: &SynthesizedBuffer) -> SamplesBuffer<f32> {
        SamplesBuffer::new(buffer.channels, buffer.sample_rate, buffer.samples.clone())
    }
}

impl AudioOutput for RodioOutput {
    fn start_file_loop(&mut self, path: &Path, volume: f32) -> Result<(), SoundError> {
        self.stop();

        let decoder =
            Decoder::new_looped(Self::open(path)?).map_err(|e| SoundError::decode(path, e))?;

        let sink = self.new_sink()?;
        sink.set_volume(volume);
        sink.append(decoder);
        sink.play();
        self.sink = Some(sink);

        debug!("Looping {}", path.display());
        Ok(())
    }

    fn start_buffer_loop(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError> {
        self.stop();

        let sink = self.new_sink()?;
        sink.append(Self::samples(buffer).repeat_infinite());
        sink.play();
        self.sink = Some(sink);

        debug!("Looping synthesized {:?}", buffer.waveform);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn play_file_once(&mut self, path: &Path, volume: f32) -> Result<(), SoundError> {
        let decoder = Decoder::new(Self::open(path)?).map_err(|e| SoundError::decode(path, e))?;

        let sink = self.new_sink()?;
        sink.set_volume(volume);
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_buffer_once(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        sink.append(Self::samples(buffer));
        sink.detach();
        Ok(())
    }
}

impl std::fmt::Debug for RodioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioOutput")
            .field("looping", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

/// Opens the default device, returning None if audio is unavailable.
#[must_use]
pub fn try_create_output() -> Option<RodioOutput> {
    match RodioOutput::new() {
        Ok(output) => Some(output),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}

// ============================================================================
// Mock
// ============================================================================

/// A call recorded by [`MockAudioOutput`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    FileLoop { path: PathBuf, volume: f32 },
    BufferLoop { buffer: SynthesizedBuffer },
    SetVolume(f32),
    Stop,
    FileOnce { path: PathBuf, volume: f32 },
    BufferOnce { buffer: SynthesizedBuffer },
}

/// Output that records calls instead of producing sound.
#[derive(Debug, Default)]
pub struct MockAudioOutput {
    calls: Vec<OutputCall>,
    undecodable: HashSet<PathBuf>,
    device_failure: bool,
}

impl MockAudioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every attempt to play `path` fail with a decode error.
    pub fn with_undecodable(mut self, path: impl Into<PathBuf>) -> Self {
        self.undecodable.insert(path.into());
        self
    }

    /// Makes every playback attempt fail with a stream error.
    pub fn with_device_failure(mut self) -> Self {
        self.device_failure = true;
        self
    }

    pub fn calls(&self) -> &[OutputCall] {
        &self.calls
    }

    /// The most recent loop started, if any.
    pub fn last_loop(&self) -> Option<&OutputCall> {
        self.calls.iter().rev().find(|call| {
            matches!(
                call,
                OutputCall::FileLoop { .. } | OutputCall::BufferLoop { .. }
            )
        })
    }

    fn check(&self, path: Option<&Path>) -> Result<(), SoundError> {
        if self.device_failure {
            return Err(SoundError::Sink("mock device failure".to_string()));
        }
        match path {
            Some(path) if self.undecodable.contains(path) => {
                Err(SoundError::decode(path, "unsupported format"))
            }
            _ => Ok(()),
        }
    }
}

impl AudioOutput for MockAudioOutput {
    fn start_file_loop(&mut self, path: &Path, volume: f32) -> Result<(), SoundError> {
        self.check(Some(path))?;
        self.calls.push(OutputCall::FileLoop {
            path: path.to_path_buf(),
            volume,
        });
        Ok(())
    }

    fn start_buffer_loop(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError> {
        self.check(None)?;
        self.calls.push(OutputCall::BufferLoop {
            buffer: buffer.clone(),
        });
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(OutputCall::SetVolume(volume));
    }

    fn stop(&mut self) {
        self.calls.push(OutputCall::Stop);
    }

    fn play_file_once(&mut self, path: &Path, volume: f32) -> Result<(), SoundError> {
        self.check(Some(path))?;
        self.calls.push(OutputCall::FileOnce {
            path: path.to_path_buf(),
            volume,
        });
        Ok(())
    }

    fn play_buffer_once(&mut self, buffer: &SynthesizedBuffer) -> Result<(), SoundError> {
        self.check(None)?;
        self.calls.push(OutputCall::BufferOnce {
            buffer: buffer.clone(),
        });
        Ok(())
    }
}
