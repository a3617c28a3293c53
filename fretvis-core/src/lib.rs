//! # fretvis-core
//!
//! Chord engine for the fretvis fretboard explorer. Derives scale and chord
//! notes, finds playable positions, generates and ranks voicings, names
//! whatever is pinned, and runs the interactive session on top of that,
//! independent of any front end.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fretvis_core::config::Config;
//! use fretvis_core::explorer::{reduce, FretboardView};
//! use fretvis_types::{ExplorerAction, Position};
//!
//! // 1. Session and engine knobs from config
//! let config = Config::load();
//! let settings = config.engine();
//! let mut state = config.defaults();
//!
//! // 2. Feed gestures through the reducer
//! let outcome = reduce(&ExplorerAction::ClickNote(Position::new(1, 3)), &mut state, &settings);
//! // outcome.preview names a note the front end may sound
//!
//! // 3. Render
//! let view = FretboardView::new(&state, &settings);
//! let cell = view.cell(Position::new(2, 2));
//! ```
//!
//! ## Module Overview
//!
//! - [`theory`]: Pitch arithmetic, candidates, voicing generator, chord identification
//! - [`explorer`]: `reduce()`, the single entry point for session mutation, and
//!   per-cell render state
//! - [`playback`]: String octaves, frequencies and strum timing behind a `Player` trait
//! - [`persistence`]: JSON export/import of the session configuration
//! - [`config`]: TOML configuration loading (embedded defaults + user override)

pub mod config;
pub mod explorer;
pub mod persistence;
pub mod playback;
pub mod theory;
