use serde::{Deserialize, Serialize};

use crate::fretboard::Position;
use crate::music::{ChordQuality, Note, ScaleDefinition};
use crate::state::ChordDisplayMode;

/// User gestures the explorer session reacts to, one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExplorerAction {
    /// A fretboard cell was clicked.
    ClickNote(Position),
    SetQuality(ChordQuality),
    /// Cycle to the next generated shape for the selected chord.
    NextVoicing,
    ToggleLock,
    ClearChord,
    SaveChord,
    LoadSaved(u64),
    DeleteSaved(u64),
    SetRoot(Note),
    SetScale(ScaleDefinition),
    SetStringCount(usize),
    ApplyPreset(String),
    SetStringTuning(usize, Note),
    ToggleShowAll,
    /// Focus a pitch class, or release it if it is already focused.
    ToggleFocus(Note),
    SetDisplayMode(ChordDisplayMode),
    ToggleNotePreview,
}
