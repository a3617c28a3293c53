//! Fretboard coordinates, voicings and tuning presets.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::music::Note;

/// Frets on a full-size neck.
pub const TOTAL_FRETS: u8 = 24;

/// Root anchors for generated voicings are searched below this fret (inclusive).
pub const ROOT_SEARCH_FRETS: u8 = 12;

pub const FRET_MARKERS: [u8; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 24];

/// One string/fret cell. String 0 is the lowest-pitched string; fret 0 is the nut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub string: usize,
    pub fret: u8,
}

impl Position {
    pub fn new(string: usize, fret: u8) -> Self {
        Self { string, fret }
    }

    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.string, self.fret)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (string, fret) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected 'string-fret', got '{}'", s))?;
        let string = string
            .parse::<usize>()
            .map_err(|e| format!("bad string index in '{}': {}", s, e))?;
        let fret = fret
            .parse::<u8>()
            .map_err(|e| format!("bad fret in '{}': {}", s, e))?;
        Ok(Position { string, fret })
    }
}

// Documents store positions in their "string-fret" form.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A chord shape: a set of positions, compared as a sorted set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Voicing(BTreeSet<Position>);

impl Voicing {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.0.contains(&position)
    }

    /// The pinned position on `string`, if any.
    pub fn on_string(&self, string: usize) -> Option<Position> {
        self.0.iter().copied().find(|p| p.string == string)
    }

    pub fn strings(&self) -> BTreeSet<usize> {
        self.0.iter().map(|p| p.string).collect()
    }

    /// Adds `position`, dropping whatever else was pinned on its string.
    pub fn pin(&mut self, position: Position) {
        self.0.retain(|p| p.string != position.string);
        self.0.insert(position);
    }

    pub fn unpin(&mut self, position: Position) -> bool {
        self.0.remove(&position)
    }

    /// Adds without the one-per-string rule. Used for candidate fills.
    pub fn insert(&mut self, position: Position) -> bool {
        self.0.insert(position)
    }

    pub fn average_fret(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().map(|p| p.fret as f64).sum::<f64>() / self.0.len() as f64
    }
}

impl FromIterator<Position> for Voicing {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Voicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

/// A named open-string tuning, low string first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningPreset {
    pub name: &'static str,
    pub notes: &'static [Note],
}

use Note::*;

const FOUR: &[TuningPreset] = &[
    TuningPreset { name: "Standard (Bass)", notes: &[E, A, D, G] },
    TuningPreset { name: "Drop D (Bass)", notes: &[D, A, D, G] },
    TuningPreset { name: "Ukulele Standard", notes: &[G, C, E, A] },
];

const FIVE: &[TuningPreset] = &[
    TuningPreset { name: "Standard (Bass)", notes: &[B, E, A, D, G] },
    TuningPreset { name: "Drop A (Bass)", notes: &[A, E, A, D, G] },
];

const SIX: &[TuningPreset] = &[
    TuningPreset { name: "Standard E", notes: &[E, A, D, G, B, E] },
    TuningPreset { name: "Drop D", notes: &[D, A, D, G, B, E] },
    TuningPreset { name: "Eb Standard", notes: &[Ds, Gs, Cs, Fs, As, Ds] },
    TuningPreset { name: "Drop C#", notes: &[Cs, Gs, Cs, Fs, As, Ds] },
    TuningPreset { name: "Drop C", notes: &[C, G, C, F, A, D] },
    TuningPreset { name: "Open D", notes: &[D, A, D, Fs, A, D] },
    TuningPreset { name: "Open G", notes: &[D, G, D, G, B, D] },
    TuningPreset { name: "DADGAD", notes: &[D, A, D, G, A, D] },
];

const SEVEN: &[TuningPreset] = &[
    TuningPreset { name: "Drop A", notes: &[A, E, A, D, G, B, E] },
    TuningPreset { name: "Standard B", notes: &[B, E, A, D, G, B, E] },
    TuningPreset { name: "Drop G", notes: &[G, D, G, C, F, A, D] },
];

const EIGHT: &[TuningPreset] = &[
    TuningPreset { name: "Drop E", notes: &[E, B, E, A, D, G, B, E] },
    TuningPreset { name: "Standard F#", notes: &[Fs, B, E, A, D, G, B, E] },
];

const NINE: &[TuningPreset] = &[
    TuningPreset { name: "Drop B", notes: &[B, Fs, B, E, A, D, G, B, E] },
    TuningPreset { name: "Standard C#", notes: &[Cs, Fs, B, E, A, D, G, B, E] },
];

pub const MIN_STRINGS: usize = 4;
pub const MAX_STRINGS: usize = 9;

/// Presets for an instrument with `string_count` strings; empty outside 4..=9.
pub fn tuning_presets(string_count: usize) -> &'static [TuningPreset] {
    match string_count {
        4 => FOUR,
        5 => FIVE,
        6 => SIX,
        7 => SEVEN,
        8 => EIGHT,
        9 => NINE,
        _ => &[],
    }
}

pub fn default_tuning(string_count: usize) -> Option<Vec<Note>> {
    tuning_presets(string_count).first().map(|p| p.notes.to_vec())
}

/// Name of the preset matching `tuning` exactly, `None` for a custom tuning.
pub fn preset_name(tuning: &[Note]) -> Option<&'static str> {
    tuning_presets(tuning.len())
        .iter()
        .find(|p| p.notes == tuning)
        .map(|p| p.name)
}

pub fn find_preset(string_count: usize, name: &str) -> Option<&'static TuningPreset> {
    tuning_presets(string_count)
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
