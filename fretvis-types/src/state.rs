use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::fretboard::{default_tuning, Position, Voicing};
use crate::music::{ChordQuality, Note, Scale, ScaleDefinition};

/// What the nut cell of a string is doing while a chord is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutState {
    /// The open string is pinned and sounds.
    Open,
    /// Explicitly muted (drawn as ✕).
    Muted,
    /// Neither pinned open nor muted.
    Free,
}

/// The chord being explored: root, quality, where the user first touched it,
/// and the shape they have pinned so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedChord {
    pub root_note: Note,
    pub quality: ChordQuality,
    #[serde(rename = "rootStringIndex")]
    pub root_string: usize,
    pub root_fret: u8,
    #[serde(rename = "customVoicing", default)]
    pub voicing: Voicing,
    #[serde(rename = "mutedStrings", default)]
    pub muted: BTreeSet<usize>,
}

impl SelectedChord {
    /// A fresh selection anchored (and pinned) at `anchor`.
    pub fn new(root_note: Note, quality: ChordQuality, anchor: Position) -> Self {
        let mut voicing = Voicing::new();
        voicing.pin(anchor);
        Self {
            root_note,
            quality,
            root_string: anchor.string,
            root_fret: anchor.fret,
            voicing,
            muted: BTreeSet::new(),
        }
    }

    pub fn anchor(&self) -> Position {
        Position::new(self.root_string, self.root_fret)
    }

    pub fn is_muted(&self, string: usize) -> bool {
        self.muted.contains(&string)
    }

    pub fn nut_state(&self, string: usize) -> NutState {
        if self.voicing.contains(Position::new(string, 0)) {
            NutState::Open
        } else if self.is_muted(string) {
            NutState::Muted
        } else {
            NutState::Free
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedChord {
    #[serde(deserialize_with = "saved_id")]
    pub id: u64,
    pub chord: SelectedChord,
    pub label: String,
}

/// Ids are written as numbers but older documents carry them as numeric strings.
fn saved_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }
    match Id::deserialize(deserializer)? {
        Id::Number(n) => Ok(n),
        Id::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid saved chord id '{}'", text))),
    }
}

/// How chord tones are labelled on the neck while a chord is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordDisplayMode {
    /// Note names.
    #[default]
    Note,
    /// Degrees relative to the chord root ("1", "b3", "5").
    Interval,
}

pub const DEFAULT_THEME: &str = "pure-vibrance";
pub const DEFAULT_STRING_COUNT: usize = 6;

/// Everything the explorer session owns. This is also the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerState {
    pub num_strings: usize,
    pub tuning: Vec<Note>,
    pub root_note: Note,
    pub scale: ScaleDefinition,
    #[serde(default = "default_true")]
    pub show_all_notes: bool,
    #[serde(default)]
    pub selected_chord: Option<SelectedChord>,
    #[serde(default)]
    pub saved_chords: Vec<SavedChord>,
    #[serde(default)]
    pub is_locked: bool,
    pub theme: String,
    /// Highlighted pitch class; every other note is dimmed.
    #[serde(default)]
    pub focused_note: Option<Note>,
    #[serde(default)]
    pub chord_display_mode: ChordDisplayMode,
    #[serde(default = "default_true")]
    pub enable_note_preview: bool,
}

fn default_true() -> bool {
    true
}

impl ExplorerState {
    pub fn new() -> Self {
        Self {
            num_strings: DEFAULT_STRING_COUNT,
            tuning: default_tuning(DEFAULT_STRING_COUNT).unwrap_or_default(),
            root_note: Note::C,
            scale: Scale::Major.definition(),
            show_all_notes: true,
            selected_chord: None,
            saved_chords: Vec::new(),
            is_locked: false,
            theme: DEFAULT_THEME.to_string(),
            focused_note: None,
            chord_display_mode: ChordDisplayMode::Note,
            enable_note_preview: true,
        }
    }

    /// Next free id for a saved chord.
    pub fn next_saved_id(&self) -> u64 {
        self.saved_chords.iter().map(|c| c.id.saturating_add(1)).max().unwrap_or(1)
    }
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}
