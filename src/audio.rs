// src/audio.rs
//
// Audio capability consumed by the scheduler.
//
// Tone generation lives outside the core (a browser synth, a native audio
// backend). The core only tells it what to play and when, in transport
// seconds.

use log::debug;

use crate::error::ResourceError;
use crate::event::AudioCommand;

/// Injected audio output.
pub trait AudioSink {
    /// Start the audio context. Must happen from a user gesture before any
    /// playback is accepted.
    fn start(&mut self) -> Result<(), ResourceError>;

    fn is_started(&self) -> bool;

    /// One short tone.
    fn trigger_tone(&mut self, frequency: f64, duration: f64, at: f64);

    /// Start the continuous oscillator.
    fn start_oscillator(&mut self, frequency: f64, at: f64);

    fn set_frequency_at(&mut self, frequency: f64, at: f64);

    /// Linear ramp of the oscillator frequency, ending at `by`.
    fn ramp_frequency_to(&mut self, frequency: f64, by: f64);

    /// Silence every source at `at` and drop changes scheduled after it.
    ///
    /// Transport time stands still until [`resume`](Self::resume), which
    /// carries the same `at`; the sink shifts its own clock by however long
    /// the pause lasted.
    fn pause(&mut self, at: f64);

    fn resume(&mut self, at: f64);

    /// Stop and dispose every sound source.
    fn stop_all(&mut self, at: f64);
}

/// Audio sink that records commands instead of producing sound.
///
/// Used by the command-line driver, the web bindings (the page replays the
/// commands on its own synth) and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    started: bool,
    paused: bool,
    commands: Vec<AudioCommand>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose audio context is already running.
    pub fn started() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    /// Sources are silenced by a pause.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    /// Take every recorded command.
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Frequencies of the recorded discrete tones, in order.
    pub fn tone_frequencies(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Tone { frequency, .. } => Some(*frequency),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: AudioCommand) {
        debug!("audio: {command:?}");
        self.commands.push(command);
    }
}

impl AudioSink for RecordingAudio {
    fn start(&mut self) -> Result<(), ResourceError> {
        self.started = true;
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn trigger_tone(&mut self, frequency: f64, duration: f64, at: f64) {
        self.record(AudioCommand::Tone {
            frequency,
            duration,
            at,
        });
    }

    fn start_oscillator(&mut self, frequency: f64, at: f64) {
        self.record(AudioCommand::StartOscillator { frequency, at });
    }

    fn set_frequency_at(&mut self, frequency: f64, at: f64) {
        self.record(AudioCommand::SetFrequency { frequency, at });
    }

    fn ramp_frequency_to(&mut self, frequency: f64, by: f64) {
        self.record(AudioCommand::RampFrequency { frequency, by });
    }

    fn pause(&mut self, at: f64) {
        self.paused = true;
        self.record(AudioCommand::Pause { at });
    }

    fn resume(&mut self, at: f64) {
        self.paused = false;
        self.record(AudioCommand::Resume { at });
    }

    fn stop_all(&mut self, at: f64) {
        self.paused = false;
        self.record(AudioCommand::StopAll { at });
    }
}
