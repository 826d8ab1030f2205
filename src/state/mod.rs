// src/state/mod.rs
//
// Declarative state layer for the UI glue.
//
// This module contains the data the UI hands to the core (datasets, chart
// selection, commands) and what the core reports back (playback state,
// affordances, readback).
//
// Key principles:
// - Datasets are immutable once built and replaced wholesale
// - Mutations of the playback session happen through Commands or the
//   session's methods
// - The transition table is pure and lives here, not in the scheduler

mod command;
mod dataset;
mod playback;
mod session;

pub use command::*;
pub use dataset::*;
pub use playback::*;
pub use session::*;
