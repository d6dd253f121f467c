//! Procedural audio used when no sound file can be played.

use std::f32::consts::TAU;

use rand::Rng;

/// Sample rate of synthesized buffers, in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Length of one synthesized ambient loop, in seconds.
pub const LOOP_SECONDS: f32 = 2.0;

/// Frequency of the synthesized notification chime, in Hz.
pub const CHIME_FREQUENCY: f32 = 880.0;

/// Length of the synthesized notification chime, in seconds.
pub const CHIME_SECONDS: f32 = 0.5;

const CHIME_VOLUME: f32 = 0.5;

/// Shape of a synthesized signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// A pure tone.
    Sine { frequency: f32 },
    /// Uniform random samples in [-1, 1].
    WhiteNoise,
}

/// A mono PCM buffer with its volume already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedBuffer {
    pub waveform: Waveform,
    pub sample_rate: u32,
    pub channels: u16,
    pub volume: f32,
    pub samples: Vec<f32>,
}

impl SynthesizedBuffer {
    /// Duration of the buffer in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}

/// Generates `seconds` of `waveform` scaled by `volume`.
pub fn synthesize(waveform: Waveform, seconds: f32, volume: f32) -> SynthesizedBuffer {
    let volume = volume.clamp(0.0, 1.0);
    let count = (SAMPLE_RATE as f32 * seconds.max(0.0)) as usize;

    let samples = match waveform {
        Waveform::Sine { frequency } => (0..count)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                (TAU * frequency * t).sin() * volume
            })
            .collect(),
        Waveform::WhiteNoise => {
            let mut rng = rand::thread_rng();
            (0..count)
                .map(|_| rng.gen_range(-1.0_f32..=1.0) * volume)
                .collect()
        }
    };

    SynthesizedBuffer {
        waveform,
        sample_rate: SAMPLE_RATE,
        channels: 1,
        volume,
        samples,
    }
}

/// Generates one ambient loop.
pub fn synthesize_loop(waveform: Waveform, volume: f32) -> SynthesizedBuffer {
    synthesize(waveform, LOOP_SECONDS, volume)
}

/// Generates the notification chime: a short tone fading out linearly.
pub fn notification_chime() -> SynthesizedBuffer {
    let mut buffer = synthesize(
        Waveform::Sine {
            frequency: CHIME_FREQUENCY,
        },
        CHIME_SECONDS,
        CHIME_VOLUME,
    );

    let len = buffer.samples.len().max(1) as f32;
    for (i, sample) in buffer.samples.iter_mut().enumerate() {
        *sample *= 1.0 - i as f32 / len;
    }
    buffer
}
