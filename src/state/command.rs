// Commands from the UI glue to the playback session.
//
// Commands mirror the session's public calls so a host can queue user
// actions (button clicks, slider input) and apply them between ticks.

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ═══════════════════════════════════════════
    // Transport
    // ═══════════════════════════════════════════
    /// Start audio from a user gesture.
    StartAudio,

    /// Play button: start a run over `[start, end]`, or resume a paused one.
    Play { start: i64, end: i64 },

    /// Play button with the raw text of the index fields.
    PlayInput { start: String, end: String },

    /// Pause button.
    Pause,

    /// Reset button.
    Reset,

    // ═══════════════════════════════════════════
    // Controls
    // ═══════════════════════════════════════════
    /// Speed slider moved.
    SetSpeed { speed: f64 },
}
