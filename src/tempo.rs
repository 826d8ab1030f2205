// src/tempo.rs

use std::cell::Cell;
use std::rc::Rc;

/// Reference tempo at speed 1.0.
pub const BASE_BPM: f64 = 120.0;

/// Playback tempo: a reference BPM scaled by the user's speed.
///
/// One sonified data point lasts one beat (a quarter note). Tones in
/// discrete mode last half a beat (an eighth note).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tempo {
    /// Tempo at speed 1.0
    pub base_bpm: f64,

    /// Speed multiplier from the UI
    pub speed: f64,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            base_bpm: BASE_BPM,
            speed: 1.0,
        }
    }
}

impl Tempo {
    pub fn new(base_bpm: f64, speed: f64) -> Self {
        Self { base_bpm, speed }
    }

    /// Effective tempo in beats per minute.
    #[inline]
    pub fn bpm(&self) -> f64 {
        self.base_bpm * self.speed
    }

    /// Seconds between two sonified points.
    #[inline]
    pub fn note_duration(&self) -> f64 {
        60.0 / self.bpm()
    }

    /// Seconds a discrete tone sounds.
    #[inline]
    pub fn tone_duration(&self) -> f64 {
        self.note_duration() / 2.0
    }

    pub fn with_speed(self, speed: f64) -> Self {
        Self { speed, ..self }
    }
}

/// Tempo shared by the scheduler and the highlight synchronizer.
///
/// Both components read note durations from the same cell, so a speed
/// change reaches both. Their timers still run independently; small drift
/// between them under host contention is tolerated.
#[derive(Debug, Clone, Default)]
pub struct SharedTempo(Rc<Cell<Tempo>>);

impl SharedTempo {
    pub fn new(tempo: Tempo) -> Self {
        Self(Rc::new(Cell::new(tempo)))
    }

    #[inline]
    pub fn get(&self) -> Tempo {
        self.0.get()
    }

    pub fn set_speed(&self, speed: f64) {
        self.0.set(self.get().with_speed(speed));
    }

    #[inline]
    pub fn note_duration(&self) -> f64 {
        self.get().note_duration()
    }
}

/// Slider label for a speed value, e.g. `"1.5x"`.
pub fn speed_label(speed: f64) -> String {
    format!("{speed}x")
}
