// src/transport.rs

use log::debug;

/// Tolerance when comparing beat positions.
const BEAT_EPSILON: f64 = 1e-9;

//
// ===============================
// MARK: Transport state
// ===============================
//

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Started,
    Paused,
}

/// Handle to one scheduled callback.
///
/// Handles are never reused within a transport, so clearing a stale handle
/// can never hit a newer callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: ScheduleHandle,
    beat: f64,
    payload: T,
}

/// A callback whose time has come.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub handle: ScheduleHandle,

    /// Beat the callback was scheduled at
    pub beat: f64,

    /// Transport time in seconds at which it fires
    pub time: f64,

    pub payload: T,
}

//
// ===================================
// MARK: Logical transport clock
// ===================================
//

/// Logical transport clock.
///
/// This struct:
/// - is owned by exactly one scheduler
/// - keeps callbacks in musical time (beats), so a tempo change only moves
///   what is still ahead
/// - advances only when the host calls [`Transport::advance`] while started
#[derive(Debug)]
pub struct Transport<T> {
    state: TransportState,

    /// Current tempo
    bpm: f64,

    /// Musical position in beats
    beat_pos: f64,

    /// Transport time in seconds since the last stop
    seconds: f64,

    next_handle: u64,

    pending: Vec<Scheduled<T>>,
}

impl<T> Transport<T> {
    pub fn new(bpm: f64) -> Self {
        Self {
            state: TransportState::Stopped,
            bpm,
            beat_pos: 0.0,
            seconds: 0.0,
            next_handle: 0,
            pending: Vec::with_capacity(64),
        }
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    /// Transport time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.seconds
    }

    #[inline]
    pub fn beat_position(&self) -> f64 {
        self.beat_pos
    }

    #[inline]
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    #[inline]
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Number of callbacks still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: ScheduleHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    // -------------------------------
    // MARK: Control
    // -------------------------------

    pub fn start(&mut self) {
        self.state = TransportState::Started;
    }

    /// Freeze at the current position.
    pub fn pause(&mut self) {
        if self.state == TransportState::Started {
            self.state = TransportState::Paused;
        }
    }

    /// Stop and rewind to zero. Scheduled callbacks are kept.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.beat_pos = 0.0;
        self.seconds = 0.0;
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    // -------------------------------
    // MARK: Scheduling
    // -------------------------------

    /// Schedule `payload` at an absolute beat from transport zero.
    pub fn schedule_at(&mut self, beat: f64, payload: T) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            beat,
            payload,
        });
        handle
    }

    /// Remove a pending callback. Clearing an unknown or already fired
    /// handle is a no-op.
    pub fn clear(&mut self, handle: ScheduleHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        before != self.pending.len()
    }

    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    // -------------------------------
    // MARK: Time advancement
    // -------------------------------

    /// Advance transport time by `seconds` of host time and collect every
    /// callback that falls inside the window, in beat order.
    ///
    /// Does nothing unless the transport is started. Callbacks scheduled
    /// before the current position are dropped.
    pub fn advance(&mut self, seconds: f64) -> Vec<Fired<T>> {
        if self.state != TransportState::Started {
            return Vec::new();
        }

        let start_beat = self.beat_pos;
        let end_beat = start_beat + seconds * (self.bpm / 60.0);

        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            let beat = self.pending[index].beat;
            if beat < start_beat - BEAT_EPSILON {
                let stale = self.pending.swap_remove(index);
                debug!("dropping callback {:?} scheduled in the past", stale.handle);
            } else if beat <= end_beat + BEAT_EPSILON {
                due.push(self.pending.swap_remove(index));
            } else {
                index += 1;
            }
        }

        due.sort_by(|a, b| {
            a.beat
                .total_cmp(&b.beat)
                .then(a.handle.0.cmp(&b.handle.0))
        });

        let fired = due
            .into_iter()
            .map(|s| Fired {
                handle: s.handle,
                beat: s.beat,
                time: self.seconds + self.beat_offset_to_seconds((s.beat - start_beat).max(0.0)),
                payload: s.payload,
            })
            .collect();

        self.beat_pos = end_beat;
        self.seconds += seconds;

        fired
    }

    /// Convert a beat offset into seconds at the current tempo.
    #[inline]
    pub fn beat_offset_to_seconds(&self, beats: f64) -> f64 {
        beats * 60.0 / self.bpm
    }
}
