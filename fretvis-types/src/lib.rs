//! # fretvis-types
//!
//! Shared data definitions for the fretvis fretboard explorer: pitch classes,
//! scale and chord tables, fretboard positions and voicings, tuning presets,
//! and the session state the explorer mutates.
//!
//! No theory lives here beyond what the types need to describe themselves;
//! the computations are in `fretvis-core`.

pub mod action;
pub mod fretboard;
pub mod music;
pub mod state;

pub use action::ExplorerAction;
pub use fretboard::*;
pub use music::*;
pub use state::*;
