// src/lib.rs
//
// Library entry point: chart sonification core.
//
// Data flows one way: a `Chart` is sliced into an `EventSequence`, the
// `Scheduler` places it on a beat timeline, and the `HighlightSynchronizer`
// paints the matching chart elements. `PlaybackSession` ties them together
// behind the playback state machine.

pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod highlight;
pub mod loader;
pub mod mapper;
pub mod range;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tempo;
pub mod timer;
pub mod transport;

#[cfg(feature = "web")]
pub mod web;

// Re-export key types for Rust consumers
pub use audio::{AudioSink, RecordingAudio};
pub use config::SonifyConfig;
pub use error::{ConfigError, DatasetError, PlaybackError, ResourceError, ValidationError};
pub use event::{AudioCommand, EventSequence, SonificationEvent};
pub use highlight::{ColorArray, HighlightSynchronizer, HighlightTarget};
pub use mapper::{FrequencyBand, map_value_to_frequency};
pub use range::{SonificationRange, extract};
pub use scheduler::Scheduler;
pub use session::PlaybackSession;
pub use state::{Chart, ChartKind, Command, Dataset, Heatmap, PlaybackState, Series};
pub use tempo::{SharedTempo, Tempo};
