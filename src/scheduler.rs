// src/scheduler.rs

use log::{debug, info};

use crate::audio::AudioSink;
use crate::error::ValidationError;
use crate::event::{EventSequence, ScheduledAction};
use crate::state::{PlaybackState, SonificationMode};
use crate::tempo::SharedTempo;
use crate::transport::{Fired, ScheduleHandle, Transport, TransportState};

/// What one host step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Audio callbacks that fired (the terminal one excluded)
    pub fired: usize,

    /// The terminal callback fired during this step
    pub finished: bool,
}

/// Glide handed to the sink, possibly still ramping.
#[derive(Debug, Clone, Copy)]
struct ActiveGlide {
    from: f64,
    to: f64,
    /// Beat the ramp started on; it ends one beat later
    beat: f64,
}

impl ActiveGlide {
    fn frequency_at(&self, beat: f64) -> f64 {
        let t = (beat - self.beat).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_ramping_at(&self, beat: f64) -> bool {
        beat < self.beat + 1.0
    }
}

/// Turns an event sequence into timed audio on a logical transport.
///
/// The scheduler owns the transport exclusively. Event *i* sits at beat *i*;
/// the terminal callback sits at beat `len`. Because callbacks live in
/// beats, a tempo change only affects what is still ahead.
pub struct Scheduler<A: AudioSink> {
    /// Transport carrying every pending callback of the current run
    transport: Transport<ScheduledAction>,

    audio: A,

    tempo: SharedTempo,

    state: PlaybackState,

    mode: Option<SonificationMode>,

    /// Pending end-of-run callback
    terminal: Option<ScheduleHandle>,

    /// Audio sources exist and must be disposed
    sources_active: bool,

    /// Latest glide of a continuous run
    glide: Option<ActiveGlide>,
}

impl<A: AudioSink> Scheduler<A> {
    pub fn new(audio: A, tempo: SharedTempo) -> Self {
        Self {
            transport: Transport::new(tempo.get().bpm()),
            audio,
            tempo,
            state: PlaybackState::Idle,
            mode: None,
            terminal: None,
            sources_active: false,
            glide: None,
        }
    }

    // -------------------------------
    // MARK: Transport control
    // -------------------------------

    /// Schedule a new run and start the transport.
    ///
    /// Any previous run is stopped and cleared first, so none of its
    /// callbacks can fire against the new one.
    pub fn start(
        &mut self,
        events: &EventSequence,
        mode: SonificationMode,
    ) -> Result<(), ValidationError> {
        if events.is_empty() {
            return Err(ValidationError::EmptyRange);
        }

        self.stop_and_clear(self.transport.now());

        let tempo = self.tempo.get();
        self.transport.set_bpm(tempo.bpm());
        self.mode = Some(mode);

        match mode {
            SonificationMode::Discrete | SonificationMode::Heatmap => {
                for (i, event) in events.iter().enumerate() {
                    self.transport.schedule_at(
                        i as f64,
                        ScheduledAction::Tone {
                            frequency: event.frequency,
                            source_index: event.source_index,
                        },
                    );
                }
            }
            SonificationMode::Continuous => {
                let first = events.events()[0].frequency;
                self.audio.start_oscillator(first, self.transport.now());

                for (i, pair) in events.events().windows(2).enumerate() {
                    self.transport.schedule_at(
                        i as f64,
                        ScheduledAction::Glide {
                            from: pair[0].frequency,
                            to: pair[1].frequency,
                            source_index: pair[0].source_index,
                        },
                    );
                }
            }
        }
        self.sources_active = true;

        self.terminal = Some(
            self.transport
                .schedule_at(events.len() as f64, ScheduledAction::Finish),
        );

        self.transport.start();
        self.state = PlaybackState::Playing;

        info!(
            "playback started: {} events, {:?}, {} bpm",
            events.len(),
            mode,
            tempo.bpm()
        );
        Ok(())
    }

    /// Freeze the transport and silence the sink.
    ///
    /// The terminal callback and audio sources stay. A glide in progress is
    /// held at the frequency it reached.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let now = self.transport.now();
        if let Some(glide) = self.glide {
            let held = glide.frequency_at(self.transport.beat_position());
            self.audio.set_frequency_at(held, now);
        }
        if self.sources_active {
            self.audio.pause(now);
        }
        self.transport.pause();
        self.state = PlaybackState::Paused;
        info!("playback paused at beat {:.3}", self.transport.beat_position());
    }

    /// Continue from the frozen position at the current tempo.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.transport.set_bpm(self.tempo.get().bpm());
        self.transport.start();
        if self.sources_active {
            self.audio.resume(self.transport.now());
        }
        self.retarget_glide();
        self.state = PlaybackState::Playing;
        info!("playback resumed at beat {:.3}", self.transport.beat_position());
    }

    /// Change playback speed.
    ///
    /// The shared tempo always takes the new speed. The live transport
    /// follows at once only while playing; a paused run picks it up on
    /// resume.
    pub fn change_speed(&mut self, speed: f64) {
        self.tempo.set_speed(speed);
        if self.state == PlaybackState::Playing {
            self.transport.set_bpm(self.tempo.get().bpm());
            self.retarget_glide();
            debug!("live tempo now {} bpm", self.transport.bpm());
        }
    }

    /// Re-issue the rest of an unfinished glide from the current position
    /// at the current tempo.
    fn retarget_glide(&mut self) {
        let beat = self.transport.beat_position();
        let Some(glide) = self.glide.filter(|g| g.is_ramping_at(beat)) else {
            return;
        };
        let now = self.transport.now();
        let remaining = self.transport.beat_offset_to_seconds(glide.beat + 1.0 - beat);
        self.audio.set_frequency_at(glide.frequency_at(beat), now);
        self.audio.ramp_frequency_to(glide.to, now + remaining);
    }

    /// Stop, dispose audio, clear every callback and rewind. Idempotent.
    pub fn reset(&mut self) {
        self.stop_and_clear(self.transport.now());
        self.state = PlaybackState::Idle;
    }

    /// Tear the run down; sources stop at `stop_at` transport seconds.
    fn stop_and_clear(&mut self, stop_at: f64) {
        if self.transport.state() != TransportState::Stopped {
            self.transport.stop();
        }
        if self.sources_active {
            self.audio.stop_all(stop_at);
            self.sources_active = false;
        }
        self.glide = None;
        if let Some(handle) = self.terminal.take() {
            self.transport.clear(handle);
        }
        self.transport.clear_all();
        self.mode = None;
    }

    // -------------------------------
    // MARK: Time advancement
    // -------------------------------

    /// Advance the transport by `seconds` of host time and fire every
    /// callback that falls due.
    pub fn tick(&mut self, seconds: f64) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state != PlaybackState::Playing {
            return outcome;
        }

        for fired in self.transport.advance(seconds) {
            if self.fire(fired) {
                outcome.finished = true;
                break;
            }
            outcome.fired += 1;
        }

        outcome
    }

    /// Returns `true` when the run finished.
    fn fire(&mut self, fired: Fired<ScheduledAction>) -> bool {
        let note = self.transport.beat_offset_to_seconds(1.0);

        match fired.payload {
            ScheduledAction::Tone {
                frequency,
                source_index,
            } => {
                debug!("tone {frequency:.2} Hz for index {source_index} at {:.3}s", fired.time);
                self.audio.trigger_tone(frequency, note / 2.0, fired.time);
                false
            }
            ScheduledAction::Glide {
                from,
                to,
                source_index,
            } => {
                debug!("glide {from:.2} -> {to:.2} Hz from index {source_index} at {:.3}s", fired.time);
                self.audio.set_frequency_at(from, fired.time);
                self.audio.ramp_frequency_to(to, fired.time + note);
                self.glide = Some(ActiveGlide {
                    from,
                    to,
                    beat: fired.beat,
                });
                false
            }
            ScheduledAction::Finish => {
                self.finish(fired.handle, fired.time);
                true
            }
        }
    }

    fn finish(&mut self, handle: ScheduleHandle, at: f64) {
        if self.terminal == Some(handle) {
            self.terminal = None;
        }
        self.stop_and_clear(at);
        self.state = PlaybackState::Finished;
        info!("playback finished at {at:.3}s");
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> Option<SonificationMode> {
        self.mode
    }

    pub fn transport(&self) -> &Transport<ScheduledAction> {
        &self.transport
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn has_pending_terminal(&self) -> bool {
        self.terminal
            .is_some_and(|handle| self.transport.is_pending(handle))
    }

    pub fn tempo(&self) -> &SharedTempo {
        &self.tempo
    }
}
