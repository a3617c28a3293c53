//! ASCII fretboard drawing. High string on top, the way a player looks down at the neck.

use std::fmt::Write;

use fretvis_core::explorer::{Cell, Emphasis};
use fretvis_types::{Note, Position, FRET_MARKERS};

const CELL: usize = 4;

/// What to draw in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Empty,
    Note(String),
    /// Root or focused note, drawn as `[C]`.
    Strong(String),
    /// Ghosted note, drawn as `(C)`.
    Faint(String),
    Muted,
}

impl From<Option<Cell>> for Mark {
    fn from(cell: Option<Cell>) -> Self {
        let Some(cell) = cell else {
            return Mark::Empty;
        };
        if cell.chord.is_some_and(|c| c.muted) {
            return Mark::Muted;
        }
        match cell.emphasis {
            Emphasis::Hidden => Mark::Empty,
            Emphasis::Faint => Mark::Faint(cell.label),
            Emphasis::Normal => Mark::Note(cell.label),
            Emphasis::Strong => Mark::Strong(cell.label),
        }
    }
}

/// Draws frets `0..=last_fret` of `tuning`, asking `mark` for every cell.
pub fn fretboard(tuning: &[Note], last_fret: u8, mark: impl Fn(Position) -> Mark) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:>3} ", "");
    for fret in 0..=last_fret {
        let label = if fret == 0 || FRET_MARKERS.contains(&fret) {
            fret.to_string()
        } else {
            String::new()
        };
        let _ = write!(out, "{:^width$} ", label, width = CELL);
    }
    out.push('\n');

    for (string, &base) in tuning.iter().enumerate().rev() {
        let _ = write!(out, "{:>3} ", base.name());
        for fret in 0..=last_fret {
            let cell = match mark(Position::new(string, fret)) {
                Mark::Empty => "-".repeat(CELL),
                Mark::Note(label) => format!("{:-^width$}", label, width = CELL),
                Mark::Strong(label) => format!("{:-^width$}", format!("[{}]", label), width = CELL),
                Mark::Faint(label) => format!("{:-^width$}", format!("({})", label), width = CELL),
                Mark::Muted => format!("{:-^width$}", "x", width = CELL),
            };
            out.push_str(&cell);
            out.push(if fret == 0 { '‖' } else { '|' });
        }
        out.push('\n');
    }
    out
}
