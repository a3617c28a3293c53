//! Pitch-class arithmetic and the chord engine built on it.
//!
//! Everything here is a pure function of its arguments: no state, no I/O.
//! Degenerate inputs (empty tuning, empty interval set, no reachable shape)
//! produce empty results rather than errors.

pub mod candidates;
pub mod identify;
pub mod voicing;

pub use candidates::{playable_candidates, playable_candidates_within};
pub use identify::{identify_chord, NO_NOTES_PINNED};
pub use voicing::{generate_voicings, generate_voicings_within};

use fretvis_types::{ChordQuality, IntervalSet, Note};

/// `root` moved up by `offset` semitones, wrapping within the octave.
pub fn note_at_offset(root: Note, offset: i32) -> Note {
    root.transpose(offset)
}

/// Concrete notes of a scale, in the scale's interval order.
pub fn scale_notes(root: Note, scale: &impl IntervalSet) -> Vec<Note> {
    scale
        .intervals()
        .iter()
        .map(|&interval| note_at_offset(root, interval as i32))
        .collect()
}

/// Concrete notes of a chord, in the quality's interval order.
pub fn chord_notes(root: Note, chord: &impl IntervalSet) -> Vec<Note> {
    scale_notes(root, chord)
}

pub fn note_on_fret(string_base: Note, fret: u8) -> Note {
    note_at_offset(string_base, fret as i32)
}

pub fn is_in_scale(note: Note, scale_notes: &[Note]) -> bool {
    scale_notes.contains(&note)
}

pub fn is_root(note: Note, root: Note) -> bool {
    note == root
}

/// Triad quality that fits `root` inside a scale: diminished if the scale has
/// the minor third and flat fifth above it, minor with the minor third and
/// perfect fifth, otherwise major.
pub fn suggest_chord_quality(root: Note, scale_notes: &[Note]) -> ChordQuality {
    if !scale_notes.contains(&root) {
        return ChordQuality::Major;
    }
    let has = |interval: i32| scale_notes.contains(&note_at_offset(root, interval));

    let minor_third = has(3);
    if minor_third && has(6) {
        ChordQuality::Diminished
    } else if minor_third && has(7) {
        ChordQuality::Minor
    } else {
        // A major third with a perfect fifth, or anything unrecognised.
        ChordQuality::Major
    }
}

/// Coarse role of a note relative to a chord root, used to colour cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalType {
    Root,
    Third,
    Fifth,
    Seventh,
    Other,
}

pub fn interval_type(root: Note, note: Note) -> IntervalType {
    match note.interval_from(root) {
        0 => IntervalType::Root,
        3 | 4 => IntervalType::Third,
        6 | 7 => IntervalType::Fifth,
        10 | 11 => IntervalType::Seventh,
        _ => IntervalType::Other,
    }
}

const DEGREES: [&str; 12] = ["1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7"];

/// Scale-degree label ("1", "b3", "5", ...) of `note` above `root`.
pub fn interval_degree(root: Note, note: Note) -> &'static str {
    DEGREES[note.interval_from(root) as usize]
}
