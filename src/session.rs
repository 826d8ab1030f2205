// src/session.rs
//
// Playback session: the single surface the UI glue talks to.
//
// The session owns the scheduler, the highlight synchronizer and the
// playback state. Every user action goes through the transition table in
// `state::playback`; actions that are not legal in the current state are
// no-ops. The host drives time by calling `tick` from its event loop.

use log::{info, warn};

use crate::audio::AudioSink;
use crate::config::SonifyConfig;
use crate::error::{PlaybackError, ResourceError, ValidationError};
use crate::event::EventSequence;
use crate::highlight::{HighlightSynchronizer, HighlightTarget};
use crate::range;
use crate::scheduler::{Scheduler, TickOutcome};
use crate::state::{
    Affordances, Chart, Command, Control, Effect, PlaybackState, SessionReadback, Transition,
    TransportReadback,
};
use crate::tempo::{SharedTempo, speed_label};

/// Playback session over an audio sink and a highlight target.
pub struct PlaybackSession<A: AudioSink, H: HighlightTarget> {
    config: SonifyConfig,

    /// Tempo shared by scheduler and synchronizer.
    tempo: SharedTempo,

    scheduler: Scheduler<A>,

    highlight: HighlightSynchronizer<H>,

    state: PlaybackState,
}

impl<A: AudioSink, H: HighlightTarget> PlaybackSession<A, H> {
    pub fn new(config: SonifyConfig, audio: A, target: H) -> Self {
        let tempo = SharedTempo::new(config.initial_tempo());
        let scheduler = Scheduler::new(audio, tempo.clone());
        let highlight =
            HighlightSynchronizer::new(target, tempo.clone(), config.highlight_color.clone());

        Self {
            config,
            tempo,
            scheduler,
            highlight,
            state: PlaybackState::Idle,
        }
    }

    // -------------------------------
    // MARK: User actions
    // -------------------------------

    /// Start the audio context. Call from a user gesture.
    pub fn start_audio(&mut self) -> Result<(), ResourceError> {
        if self.scheduler.audio().is_started() {
            return Ok(());
        }
        self.scheduler.audio_mut().start()?;
        info!("audio started");
        Ok(())
    }

    /// Play button.
    ///
    /// From Idle this validates `[start, end]` and starts a new run; from
    /// Paused it resumes; anywhere else it does nothing. A rejected range
    /// leaves the state untouched.
    pub fn play(
        &mut self,
        chart: &Chart,
        start: i64,
        end: i64,
        speed: f64,
    ) -> Result<Transition, PlaybackError> {
        self.require_audio()?;
        let speed = self.config.check_speed(speed)?;

        let prepared = match self.state {
            PlaybackState::Idle => Some(self.prepare(chart, start, end)),
            _ => None,
        };
        let range_valid = matches!(prepared, Some(Ok(_)));

        let transition = self.state.transition(Control::Play { range_valid });
        match (transition.effect, prepared) {
            (Effect::Start, Some(Ok(events))) => {
                self.start_run(chart, &events, speed)?;
            }
            (Effect::RejectRange, Some(Err(e))) => {
                warn!("play rejected: {e}");
                return Err(e.into());
            }
            (Effect::Resume, _) => {
                self.scheduler.change_speed(speed);
                self.scheduler.resume();
                self.highlight.resume();
            }
            _ => {
                warn!("play ignored in state {:?}", self.state);
            }
        }

        self.state = transition.to;
        Ok(transition)
    }

    /// Play button with the raw text of the index fields.
    pub fn play_input(
        &mut self,
        chart: &Chart,
        start: &str,
        end: &str,
        speed: f64,
    ) -> Result<Transition, PlaybackError> {
        match self.state {
            PlaybackState::Idle => {
                self.require_audio()?;
                let (start, end) = range::parse_range(start, end).inspect_err(|e| {
                    warn!("play rejected: {e}");
                })?;
                self.play(chart, start, end, speed)
            }
            // resuming ignores the index fields
            _ => self.play(chart, 0, 0, speed),
        }
    }

    /// Pause button. No-op unless playing.
    pub fn pause(&mut self) -> Transition {
        let transition = self.state.transition(Control::Pause);
        if transition.effect == Effect::Pause {
            self.scheduler.pause();
            self.highlight.pause();
        }
        self.state = transition.to;
        transition
    }

    /// Reset button. Always ends in Idle; resetting twice equals once.
    pub fn reset(&mut self) -> Transition {
        let transition = self.state.transition(Control::Reset);
        if transition.effect == Effect::Reset {
            self.scheduler.reset();
            self.highlight.restore();
            info!("session reset");
        }
        self.state = transition.to;
        transition
    }

    /// Speed slider. Legal in every state.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ValidationError> {
        let speed = self.config.check_speed(speed)?;
        self.scheduler.change_speed(speed);
        Ok(())
    }

    /// Apply a queued command against `chart`.
    pub fn apply(&mut self, command: Command, chart: &Chart) -> Result<Transition, PlaybackError> {
        let speed = self.tempo.get().speed;
        match command {
            Command::StartAudio => {
                self.start_audio()?;
                Ok(Transition::stay(self.state))
            }
            Command::Play { start, end } => self.play(chart, start, end, speed),
            Command::PlayInput { start, end } => self.play_input(chart, &start, &end, speed),
            Command::Pause => Ok(self.pause()),
            Command::Reset => Ok(self.reset()),
            Command::SetSpeed { speed } => {
                self.set_speed(speed)?;
                Ok(Transition::stay(self.state))
            }
        }
    }

    /// Replace the highlight target, e.g. after new data was loaded.
    ///
    /// Any run is reset first since its indices refer to the old chart.
    pub fn replace_target(&mut self, target: H) -> H {
        self.reset();
        self.highlight.replace_target(target)
    }

    // -------------------------------
    // MARK: Time advancement
    // -------------------------------

    /// Advance host time by `seconds`.
    pub fn tick(&mut self, seconds: f64) -> TickOutcome {
        let outcome = self.scheduler.tick(seconds);
        if outcome.finished {
            self.state = self.state.transition(Control::Finish).to;
        }
        self.highlight.tick(seconds);
        outcome
    }

    // -------------------------------
    // MARK: Internals
    // -------------------------------

    fn require_audio(&self) -> Result<(), ResourceError> {
        if self.scheduler.audio().is_started() {
            Ok(())
        } else {
            warn!("audio not started");
            Err(ResourceError::AudioNotStarted)
        }
    }

    fn prepare(
        &self,
        chart: &Chart,
        start: i64,
        end: i64,
    ) -> Result<EventSequence, ValidationError> {
        range::extract(&chart.dataset, start, end, self.config.frequency_band)
    }

    fn start_run(
        &mut self,
        chart: &Chart,
        events: &EventSequence,
        speed: f64,
    ) -> Result<(), ValidationError> {
        let (first, last) = events.index_range().ok_or(ValidationError::EmptyRange)?;

        // the previous run's capture must not leak into this one
        self.highlight.restore();

        self.scheduler.change_speed(speed);
        self.scheduler.start(events, chart.mode())?;
        self.highlight.begin(first, last);

        // beat zero sounds together with the first highlight
        self.scheduler.tick(0.0);
        Ok(())
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn affordances(&self) -> Affordances {
        self.state.affordances()
    }

    pub fn speed(&self) -> f64 {
        self.tempo.get().speed
    }

    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        self.scheduler.audio()
    }

    pub fn audio_mut(&mut self) -> &mut A {
        self.scheduler.audio_mut()
    }

    pub fn target(&self) -> &H {
        self.highlight.target()
    }

    pub fn scheduler(&self) -> &Scheduler<A> {
        &self.scheduler
    }

    pub fn highlight(&self) -> &HighlightSynchronizer<H> {
        &self.highlight
    }

    pub fn readback(&self) -> SessionReadback {
        let transport = self.scheduler.transport();
        let speed = self.speed();

        SessionReadback {
            state: self.state,
            affordances: self.affordances(),
            speed,
            speed_label: speed_label(speed),
            transport: TransportReadback {
                bpm: transport.bpm(),
                beat_position: transport.beat_position(),
                seconds: transport.now(),
            },
            cursor: self
                .highlight
                .range()
                .map(|_| self.highlight.cursor()),
            range: self.highlight.range(),
        }
    }
}
