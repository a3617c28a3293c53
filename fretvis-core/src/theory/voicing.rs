//! Geometric voicing generator.
//!
//! Shapes are built from the fretboard rather than looked up in a chord
//! dictionary, so any tuning and string count works. For every root anchor in
//! the first octave of the neck, the generator walks the higher strings and
//! takes the nearest unused chord tone on each, within a hand-sized window.

use std::collections::{BTreeSet, HashSet};

use fretvis_types::{IntervalSet, Note, Position, Voicing, ROOT_SEARCH_FRETS, TOTAL_FRETS};

use super::{chord_notes, note_on_fret};

/// Frets below the anchor a finger may stretch back to.
pub const STRETCH_BELOW: u8 = 2;
/// Frets above the anchor a finger may stretch up to.
pub const STRETCH_ABOVE: u8 = 3;

/// Ranked shapes for `root`/`chord` on a 24-fret neck, nearest to
/// `preferred_fret` first.
pub fn generate_voicings(
    tuning: &[Note],
    root: Note,
    chord: &impl IntervalSet,
    preferred_fret: u8,
) -> Vec<Voicing> {
    generate_voicings_within(tuning, root, chord, preferred_fret, TOTAL_FRETS)
}

pub fn generate_voicings_within(
    tuning: &[Note],
    root: Note,
    chord: &impl IntervalSet,
    preferred_fret: u8,
    max_fret: u8,
) -> Vec<Voicing> {
    let tones: BTreeSet<Note> = chord_notes(root, chord).into_iter().collect();
    let required = tones.len().min(3);
    let anchor_limit = ROOT_SEARCH_FRETS.min(max_fret);

    let mut accepted = Vec::new();
    for (anchor_string, &base) in tuning.iter().enumerate() {
        for anchor_fret in 0..=anchor_limit {
            if note_on_fret(base, anchor_fret) != root {
                continue;
            }
            let anchor = Position::new(anchor_string, anchor_fret);
            if let Some(voicing) = build_from_anchor(tuning, anchor, root, &tones, required, max_fret) {
                accepted.push(voicing);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut voicings: Vec<Voicing> = accepted
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect();

    // Stable: equal distances keep discovery order (anchor string, then fret).
    let target = preferred_fret as f64;
    voicings.sort_by(|a, b| {
        let da = (a.average_fret() - target).abs();
        let db = (b.average_fret() - target).abs();
        da.total_cmp(&db)
    });

    log::debug!(
        target: "voicing",
        "{} {} tones over {} strings: {} shapes",
        root,
        tones.len(),
        tuning.len(),
        voicings.len()
    );
    voicings
}

/// Walks the strings above `anchor`, adding the closest unused chord tone on
/// each. Returns `None` when the shape covers fewer than `required` tones.
fn build_from_anchor(
    tuning: &[Note],
    anchor: Position,
    root: Note,
    tones: &BTreeSet<Note>,
    required: usize,
    max_fret: u8,
) -> Option<Voicing> {
    let mut voicing = Voicing::new();
    voicing.pin(anchor);
    let mut used = BTreeSet::from([root]);

    let low = anchor.fret.saturating_sub(STRETCH_BELOW);
    let high = anchor.fret.saturating_add(STRETCH_ABOVE).min(max_fret);

    for (string, &base) in tuning.iter().enumerate().skip(anchor.string + 1) {
        if tones.iter().all(|t| used.contains(t)) {
            break;
        }

        // Strictly closer replaces, so the lowest of equidistant frets wins.
        let mut best: Option<(u8, u8)> = None;
        for fret in low..=high {
            let note = note_on_fret(base, fret);
            if !tones.contains(&note) || used.contains(&note) {
                continue;
            }
            let distance = fret.abs_diff(anchor.fret);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((fret, distance));
            }
        }

        if let Some((fret, _)) = best {
            voicing.pin(Position::new(string, fret));
            used.insert(note_on_fret(base, fret));
        }
    }

    let covered = used.iter().filter(|n| tones.contains(n)).count();
    (covered >= required).then_some(voicing)
}
