//! Which fretboard cells can join a chord being built around an anchor fret.

use std::collections::BTreeSet;

use fretvis_types::{IntervalSet, Note, Position, TOTAL_FRETS};

use super::{chord_notes, note_on_fret};

/// Frets either side of the anchor that a hand can cover without shifting.
pub const CANDIDATE_REACH: u8 = 4;

/// Chord-tone positions within reach of `anchor_fret` on a 24-fret neck.
pub fn playable_candidates(
    tuning: &[Note],
    root: Note,
    chord: &impl IntervalSet,
    anchor_fret: u8,
) -> BTreeSet<Position> {
    playable_candidates_within(tuning, root, chord, anchor_fret, TOTAL_FRETS)
}

/// Chord-tone positions on frets `0..=max_fret` lying in
/// `[anchor - 4, anchor + 4]`. Open strings qualify wherever the anchor is.
pub fn playable_candidates_within(
    tuning: &[Note],
    root: Note,
    chord: &impl IntervalSet,
    anchor_fret: u8,
    max_fret: u8,
) -> BTreeSet<Position> {
    let tones = chord_notes(root, chord);
    let low = anchor_fret.saturating_sub(CANDIDATE_REACH);
    let high = anchor_fret.saturating_add(CANDIDATE_REACH).min(max_fret);

    let mut candidates = BTreeSet::new();
    for (string, &base) in tuning.iter().enumerate() {
        for fret in 0..=max_fret {
            if !tones.contains(&note_on_fret(base, fret)) {
                continue;
            }
            if fret == 0 || (low..=high).contains(&fret) {
                candidates.insert(Position::new(string, fret));
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretvis_types::{default_tuning, ChordQuality};

    fn standard() -> Vec<Note> {
        default_tuning(6).unwrap()
    }

    #[test]
    fn every_candidate_is_a_chord_tone_in_window_or_open() {
        let tuning = standard();
        let tones = chord_notes(Note::G, &ChordQuality::Major);
        let found = playable_candidates(&tuning, Note::G, &ChordQuality::Major, 7);
        assert!(!found.is_empty());
        for p in &found {
            assert!(tones.contains(&note_on_fret(tuning[p.string], p.fret)));
            assert!(p.fret == 0 || (3..=11).contains(&p.fret), "{} out of window", p);
        }
    }

    #[test]
    fn open_strings_are_exempt_from_window() {
        // E minor: low E open is a chord tone, anchor far up the neck.
        let tuning = standard();
        let found = playable_candidates(&tuning, Note::E, &ChordQuality::Minor, 9);
        assert!(found.contains(&Position::new(0, 0)));
        assert!(found.contains(&Position::new(3, 0)), "open G is the minor third");
        assert!(!found.contains(&Position::new(0, 3)), "fret 3 is outside 5..=13");
    }

    #[test]
    fn window_clamps_at_nut_and_max_fret() {
        let tuning = standard();
        let near_nut = playable_candidates(&tuning, Note::C, &ChordQuality::Major, 1);
        assert!(near_nut.iter().all(|p| p.fret <= 5));

        let short_neck = playable_candidates_within(&tuning, Note::C, &ChordQuality::Major, 12, 14);
        assert!(short_neck.iter().all(|p| p.fret <= 14));
        assert!(!short_neck.contains(&Position::new(1, 3)));
    }

    #[test]
    fn empty_tuning_yields_nothing() {
        assert!(playable_candidates(&[], Note::C, &ChordQuality::Major, 5).is_empty());
    }

    #[test]
    fn deterministic() {
        let tuning = standard();
        let a = playable_candidates(&tuning, Note::D, &ChordQuality::Dominant7, 5);
        let b = playable_candidates(&tuning, Note::D, &ChordQuality::Dominant7, 5);
        assert_eq!(a, b);
    }
}
