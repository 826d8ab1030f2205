// src/event.rs

use serde::Serialize;

/// ===============================
/// Sonification events
/// ===============================

/// One sonified data point.
///
/// `source_index` is the flattened index in the dataset, used to correlate
/// the sound with the highlighted chart element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonificationEvent {
    pub frequency: f64,
    pub source_index: usize,
}

/// Ordered events of one playback run, in index order.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventSequence {
    events: Vec<SonificationEvent>,
}

impl EventSequence {
    pub fn new(events: Vec<SonificationEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[SonificationEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &SonificationEvent> + '_ {
        self.events.iter()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.frequency).collect()
    }

    pub fn source_indices(&self) -> Vec<usize> {
        self.events.iter().map(|e| e.source_index).collect()
    }

    /// First and last source index.
    pub fn index_range(&self) -> Option<(usize, usize)> {
        Some((self.events.first()?.source_index, self.events.last()?.source_index))
    }
}

/// ===============================
/// Transport-side scheduled actions
/// ===============================

/// Work placed on the transport, expressed in beats.
///
/// These actions:
/// - live ONLY in the scheduler's transport
/// - carry no absolute time
/// - are turned into audio commands when they fire
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledAction {
    /// Play one short tone.
    Tone {
        frequency: f64,
        source_index: usize,
    },

    /// Jump the oscillator to `from` and ramp to `to` over one note.
    Glide {
        from: f64,
        to: f64,
        source_index: usize,
    },

    /// End of the run.
    Finish,
}

/// ===============================
/// Sink-side audio commands
/// ===============================

/// A command for the audio capability, expressed in transport seconds.
///
/// Recorded by [`crate::audio::RecordingAudio`] and forwarded to the page by
/// the web bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AudioCommand {
    #[serde(rename_all = "camelCase")]
    Tone {
        frequency: f64,
        duration: f64,
        at: f64,
    },

    #[serde(rename_all = "camelCase")]
    StartOscillator { frequency: f64, at: f64 },

    #[serde(rename_all = "camelCase")]
    SetFrequency { frequency: f64, at: f64 },

    #[serde(rename_all = "camelCase")]
    RampFrequency { frequency: f64, by: f64 },

    /// Silence and hold every source; later changes are dropped.
    #[serde(rename_all = "camelCase")]
    Pause { at: f64 },

    #[serde(rename_all = "camelCase")]
    Resume { at: f64 },

    #[serde(rename_all = "camelCase")]
    StopAll { at: f64 },
}
