//! Frequencies and strum timing for whatever synthesizer the front end owns.
//!
//! Nothing here makes sound. The core hands out `(string, frequency, delay)`
//! triples and a `Player` implementation decides what to do with them.

use std::collections::BTreeSet;

use fretvis_types::{Note, Position, Voicing};

pub const DEFAULT_A4: f64 = 440.0;

/// Gap between successive strings of a strum.
pub const DEFAULT_STAGGER_MS: u32 = 35;

/// One string of a strum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrumNote {
    pub string: usize,
    pub frequency: f64,
    pub delay_ms: u32,
}

/// Receives scheduled notes. Owned and passed in by the caller; the engine
/// never reaches for a global audio context.
pub trait Player {
    fn schedule(&mut self, note: &StrumNote);
}

/// Equal-tempered frequency of `note` in scientific octave `octave`.
pub fn frequency(note: Note, octave: i32, a4: f64) -> f64 {
    let midi = (octave + 1) * 12 + note.semitone() as i32;
    a4 * 2.0_f64.powf((midi - 69) as f64 / 12.0)
}

/// Octave of the open string at `string`.
///
/// The lowest string starts at octave 1 for basses and extended-range guitars
/// (0 for a five-string whose low string is B) and octave 2 for six strings.
/// Each string whose pitch class does not rise above its lower neighbour's has
/// wrapped into the next octave.
pub fn string_octave(tuning: &[Note], string: usize) -> i32 {
    let count = tuning.len();
    let mut octave = match count {
        5 if tuning[0] == Note::B => 0,
        6 => 2,
        _ => 1,
    };
    for i in 1..=string.min(count.saturating_sub(1)) {
        if tuning[i].semitone() <= tuning[i - 1].semitone() {
            octave += 1;
        }
    }
    octave
}

/// Sounding frequency of a fretted position, or `None` off the tuning.
pub fn position_frequency(tuning: &[Note], position: Position, a4: f64) -> Option<f64> {
    let base = *tuning.get(position.string)?;
    let half_steps = base.semitone() as i32 + position.fret as i32;
    let octave = string_octave(tuning, position.string) + half_steps.div_euclid(12);
    Some(frequency(Note::from_semitone(half_steps), octave, a4))
}

/// Low-to-high strum over the pinned strings, skipping muted ones.
pub fn strum_plan(
    tuning: &[Note],
    voicing: &Voicing,
    muted: &BTreeSet<usize>,
    a4: f64,
    stagger_ms: u32,
) -> Vec<StrumNote> {
    (0..tuning.len())
        .filter(|string| !muted.contains(string))
        .filter_map(|string| voicing.on_string(string))
        .filter_map(|p| position_frequency(tuning, p, a4).map(|f| (p.string, f)))
        .enumerate()
        .map(|(i, (string, frequency))| StrumNote {
            string,
            frequency,
            delay_ms: i as u32 * stagger_ms,
        })
        .collect()
}

/// Hands every note of `plan` to `player`, in order.
pub fn strum(player: &mut impl Player, plan: &[StrumNote]) {
    for note in plan {
        player.schedule(note);
    }
}
