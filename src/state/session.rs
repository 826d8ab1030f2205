// Session readback.
//
// Snapshot of the playback session for UI display: button states, the
// speed label, the playhead and the highlight cursor. Produced by the
// session, read by the UI glue; never fed back into the core.

use serde::Serialize;

use super::{Affordances, PlaybackState};

/// Transport state visible to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportReadback {
    /// Current tempo in BPM.
    pub bpm: f64,

    /// Current position in beats.
    pub beat_position: f64,

    /// Current position in transport seconds.
    pub seconds: f64,
}

/// Read-only session state for UI display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReadback {
    pub state: PlaybackState,

    pub affordances: Affordances,

    /// Speed multiplier.
    pub speed: f64,

    /// Slider label, e.g. "1.5x".
    pub speed_label: String,

    pub transport: TransportReadback,

    /// Next index the highlight will paint, when a run is active.
    pub cursor: Option<usize>,

    /// Range of the current run.
    pub range: Option<(usize, usize)>,
}
