//! Naming a set of pinned positions relative to a declared root.

use std::collections::BTreeSet;

use fretvis_types::{ChordQuality, IntervalSet, Note, Position};

use super::note_on_fret;

/// Label returned when nothing is pinned.
pub const NO_NOTES_PINNED: &str = "No notes pinned";

/// Names the chord sounded by `positions` with `root` as the reference.
///
/// An exact interval-set match against the quality table wins. Otherwise the
/// first quality (table order) containing every sounded interval is reported
/// as partial, as long as at least two distinct intervals sound. Anything
/// else is a custom voicing. Positions on strings the tuning lacks are ignored.
pub fn identify_chord(root: Note, positions: &[Position], tuning: &[Note]) -> String {
    if positions.is_empty() {
        return NO_NOTES_PINNED.to_string();
    }

    let signature: BTreeSet<u8> = positions
        .iter()
        .filter_map(|p| tuning.get(p.string).map(|&base| note_on_fret(base, p.fret)))
        .map(|note| note.interval_from(root))
        .collect();

    if let Some(quality) = exact_match(&signature) {
        return format!("{} {}", root, quality.name());
    }
    if signature.len() > 1 {
        if let Some(quality) = partial_match(&signature) {
            return format!("Partial {} {}", root, quality.name());
        }
    }
    format!("{} (Custom Voicing)", root)
}

fn exact_match(signature: &BTreeSet<u8>) -> Option<ChordQuality> {
    ChordQuality::ALL.iter().copied().find(|q| {
        let template: BTreeSet<u8> = q.intervals().iter().copied().collect();
        template == *signature
    })
}

// First superset in table order. Several qualities can contain the same
// fragment ({0,7} is in nearly all of them), so table order decides the label.
fn partial_match(signature: &BTreeSet<u8>) -> Option<ChordQuality> {
    ChordQuality::ALL
        .iter()
        .copied()
        .find(|q| signature.iter().all(|i| q.intervals().contains(i)))
}
