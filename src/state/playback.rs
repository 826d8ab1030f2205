// Playback state machine.
//
// Pure transition table shared by the session, the scheduler and the UI.
// Any control that is not legal in the current state is a no-op; this is
// what prevents double starts and double disposals.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Play pressed; `range_valid` is the validation outcome.
    Play { range_valid: bool },
    Pause,
    Reset,
    /// The terminal callback fired.
    Finish,
}

/// Side effects a transition asks the session to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// scheduler.start + synchronizer.begin
    Start,
    /// Report the validation error; nothing else changes
    RejectRange,
    /// scheduler.pause + synchronizer.pause
    Pause,
    /// scheduler.resume + synchronizer.resume
    Resume,
    /// scheduler.reset + synchronizer.restore
    Reset,
    /// Play stays disabled until reset
    Finish,
    None,
}

/// Result of feeding one control into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlaybackState,
    pub to: PlaybackState,
    pub effect: Effect,
}

impl Transition {
    /// A transition that changes nothing.
    pub fn stay(state: PlaybackState) -> Self {
        Self {
            from: state,
            to: state,
            effect: Effect::None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.effect == Effect::None
    }
}

impl PlaybackState {
    /// Apply a control.
    pub fn transition(self, control: Control) -> Transition {
        use PlaybackState::*;

        let (to, effect) = match (self, control) {
            (Idle, Control::Play { range_valid: true }) => (Playing, Effect::Start),
            (Idle, Control::Play { range_valid: false }) => (Idle, Effect::RejectRange),
            (Playing, Control::Pause) => (Paused, Effect::Pause),
            (Paused, Control::Play { .. }) => (Playing, Effect::Resume),
            (Playing | Paused | Finished, Control::Reset) => (Idle, Effect::Reset),
            (Playing, Control::Finish) => (Finished, Effect::Finish),
            (state, _) => (state, Effect::None),
        };

        Transition {
            from: self,
            to,
            effect,
        }
    }

    /// Which buttons the UI should enable.
    pub fn affordances(self) -> Affordances {
        use PlaybackState::*;

        match self {
            Idle => Affordances {
                play: true,
                pause: false,
                reset: true,
            },
            Playing => Affordances {
                play: false,
                pause: true,
                reset: true,
            },
            Paused => Affordances {
                play: true,
                pause: false,
                reset: true,
            },
            Finished => Affordances {
                play: false,
                pause: false,
                reset: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Finished => "finished",
        }
    }
}

/// Enabled flags of the transport buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub play: bool,
    pub pause: bool,
    pub reset: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [PlaybackState; 4] = [
        PlaybackState::Idle,
        PlaybackState::Playing,
        PlaybackState::Paused,
        PlaybackState::Finished,
    ];

    const ALL_CONTROLS: [Control; 5] = [
        Control::Play { range_valid: true },
        Control::Play { range_valid: false },
        Control::Pause,
        Control::Reset,
        Control::Finish,
    ];

    #[test]
    fn test_only_valid_play_leaves_idle() {
        for control in ALL_CONTROLS {
            let t = PlaybackState::Idle.transition(control);
            if control == (Control::Play { range_valid: true }) {
                assert_eq!(t.to, PlaybackState::Playing);
                assert_eq!(t.effect, Effect::Start);
            } else {
                assert_eq!(t.to, PlaybackState::Idle);
            }
        }
        assert_eq!(
            PlaybackState::Idle
                .transition(Control::Play { range_valid: false })
                .effect,
            Effect::RejectRange
        );
    }

    #[test]
    fn test_play_in_finished_is_noop() {
        for range_valid in [true, false] {
            let t = PlaybackState::Finished.transition(Control::Play { range_valid });
            assert_eq!(t.to, PlaybackState::Finished);
            assert!(t.is_noop());
        }
    }

    #[test]
    fn test_reset_always_lands_in_idle() {
        for state in ALL_STATES {
            assert_eq!(state.transition(Control::Reset).to, PlaybackState::Idle);
        }
        // resetting an idle session does nothing
        assert!(PlaybackState::Idle.transition(Control::Reset).is_noop());
    }

    #[test]
    fn test_pause_resume_cycle() {
        let paused = PlaybackState::Playing.transition(Control::Pause);
        assert_eq!((paused.to, paused.effect), (PlaybackState::Paused, Effect::Pause));

        let resumed = paused.to.transition(Control::Play { range_valid: true });
        assert_eq!((resumed.to, resumed.effect), (PlaybackState::Playing, Effect::Resume));

        assert!(PlaybackState::Paused.transition(Control::Pause).is_noop());
        assert!(PlaybackState::Paused.transition(Control::Finish).is_noop());
    }

    #[test]
    fn test_finish_only_from_playing() {
        for state in ALL_STATES {
            let t = state.transition(Control::Finish);
            if state == PlaybackState::Playing {
                assert_eq!(t.to, PlaybackState::Finished);
            } else {
                assert!(t.is_noop());
            }
        }
    }

    #[test]
    fn test_state_names() {
        let names: Vec<_> = ALL_STATES.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["idle", "playing", "paused", "finished"]);
    }

    #[test]
    fn test_affordances() {
        assert!(PlaybackState::Idle.affordances().play);
        assert!(!PlaybackState::Playing.affordances().play);
        assert!(PlaybackState::Playing.affordances().pause);
        assert!(PlaybackState::Paused.affordances().play);
        let finished = PlaybackState::Finished.affordances();
        assert!(!finished.play && !finished.pause && finished.reset);
    }
}
