//! Chord explorer session: applies one user gesture at a time to `ExplorerState`.
//!
//! The reducer is the only place the session mutates. It never plays audio
//! itself; the returned `Outcome` names the position the caller should preview.

use std::collections::BTreeSet;

use fretvis_types::{
    find_preset, tuning_presets, ChordDisplayMode, ExplorerAction, ExplorerState, Note, Position,
    SavedChord, SelectedChord,
};

use crate::config::EngineSettings;
use crate::theory::{
    chord_notes, generate_voicings_within, identify_chord, interval_degree, interval_type,
    is_in_scale, is_root, note_on_fret, playable_candidates_within, scale_notes,
    suggest_chord_quality, IntervalType,
};

/// What a reduced action asks of the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// State was mutated.
    pub changed: bool,
    /// A single note worth sounding as feedback.
    pub preview: Option<Position>,
}

impl Outcome {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            changed: true,
            preview: None,
        }
    }

    fn previewing(position: Position) -> Self {
        Self {
            changed: true,
            preview: Some(position),
        }
    }
}

pub fn reduce(action: &ExplorerAction, state: &mut ExplorerState, settings: &EngineSettings) -> Outcome {
    match action {
        ExplorerAction::ClickNote(position) => {
            let mut outcome = click_note(state, *position);
            if !state.enable_note_preview {
                outcome.preview = None;
            }
            outcome
        }
        ExplorerAction::SetQuality(quality) => match state.selected_chord.as_mut() {
            Some(chord) => {
                chord.quality = *quality;
                Outcome::changed()
            }
            None => Outcome::unchanged(),
        },
        ExplorerAction::NextVoicing => next_voicing(state, settings),
        ExplorerAction::ToggleLock => {
            state.is_locked = !state.is_locked;
            if state.is_locked {
                if let Some(chord) = state.selected_chord.as_mut() {
                    if chord.voicing.is_empty() {
                        let candidates = playable_candidates_within(
                            &state.tuning,
                            chord.root_note,
                            &chord.quality,
                            chord.root_fret,
                            settings.max_fret,
                        );
                        for p in candidates {
                            chord.voicing.insert(p);
                        }
                    }
                }
            }
            Outcome::changed()
        }
        ExplorerAction::ClearChord => {
            state.selected_chord = None;
            state.is_locked = false;
            Outcome::changed()
        }
        ExplorerAction::SaveChord => save_chord(state),
        ExplorerAction::LoadSaved(id) => {
            match state.saved_chords.iter().find(|c| c.id == *id) {
                Some(saved) => {
                    state.selected_chord = Some(saved.chord.clone());
                    state.focused_note = None;
                    Outcome::changed()
                }
                None => {
                    log::warn!(target: "explorer", "no saved chord with id {}", id);
                    Outcome::unchanged()
                }
            }
        }
        ExplorerAction::DeleteSaved(id) => {
            let before = state.saved_chords.len();
            state.saved_chords.retain(|c| c.id != *id);
            Outcome {
                changed: state.saved_chords.len() != before,
                preview: None,
            }
        }
        ExplorerAction::SetRoot(root) => {
            state.root_note = *root;
            Outcome::changed()
        }
        ExplorerAction::SetScale(scale) => {
            state.scale = scale.clone();
            Outcome::changed()
        }
        ExplorerAction::SetStringCount(count) => {
            let Some(preset) = tuning_presets(*count).first() else {
                log::warn!(target: "explorer", "unsupported string count {}", count);
                return Outcome::unchanged();
            };
            state.num_strings = *count;
            state.tuning = preset.notes.to_vec();
            // The anchor and pins may sit on strings that no longer exist.
            state.selected_chord = None;
            state.is_locked = false;
            Outcome::changed()
        }
        ExplorerAction::ApplyPreset(name) => match find_preset(state.num_strings, name) {
            Some(preset) => {
                state.tuning = preset.notes.to_vec();
                Outcome::changed()
            }
            None => {
                log::warn!(
                    target: "explorer",
                    "no {}-string preset named '{}'",
                    state.num_strings,
                    name
                );
                Outcome::unchanged()
            }
        },
        ExplorerAction::SetStringTuning(string, note) => match state.tuning.get_mut(*string) {
            Some(slot) => {
                *slot = *note;
                Outcome::changed()
            }
            None => Outcome::unchanged(),
        },
        ExplorerAction::ToggleShowAll => {
            state.show_all_notes = !state.show_all_notes;
            Outcome::changed()
        }
        ExplorerAction::ToggleFocus(note) => {
            state.focused_note = if state.focused_note == Some(*note) { None } else { Some(*note) };
            Outcome::changed()
        }
        ExplorerAction::SetDisplayMode(mode) => {
            let changed = state.chord_display_mode != *mode;
            state.chord_display_mode = *mode;
            Outcome { changed, preview: None }
        }
        ExplorerAction::ToggleNotePreview => {
            state.enable_note_preview = !state.enable_note_preview;
            Outcome::changed()
        }
    }
}

fn click_note(state: &mut ExplorerState, position: Position) -> Outcome {
    let Some(&base) = state.tuning.get(position.string) else {
        log::warn!(target: "explorer", "click on missing string {}", position.string);
        return Outcome::unchanged();
    };
    let note = note_on_fret(base, position.fret);
    // Any click on the neck releases the focus.
    let unfocused = state.focused_note.take().is_some();

    if let Some(chord) = state.selected_chord.as_mut() {
        let is_chord_tone = chord_notes(chord.root_note, &chord.quality).contains(&note);
        if is_chord_tone || position.is_open() {
            let mut outcome = toggle_pin(chord, position);
            outcome.changed |= unfocused;
            return outcome;
        }
        if state.is_locked {
            return Outcome {
                changed: unfocused,
                preview: None,
            };
        }
    }

    let scale = scale_notes(state.root_note, &state.scale);
    let quality = suggest_chord_quality(note, &scale);
    log::debug!(target: "explorer", "new chord {} {} at {}", note, quality, position);
    state.selected_chord = Some(SelectedChord::new(note, quality, position));
    Outcome::previewing(position)
}

/// Fretted cells toggle on and off. The nut cycles Open → Muted → Free → Open.
fn toggle_pin(chord: &mut SelectedChord, position: Position) -> Outcome {
    let string = position.string;
    if chord.voicing.contains(position) {
        chord.voicing.unpin(position);
        if position.is_open() {
            chord.muted.insert(string);
        }
        return Outcome::changed();
    }
    if position.is_open() && chord.muted.remove(&string) {
        return Outcome::changed();
    }
    chord.voicing.pin(position);
    chord.muted.remove(&string);
    Outcome::previewing(position)
}

fn next_voicing(state: &mut ExplorerState, settings: &EngineSettings) -> Outcome {
    let Some(chord) = state.selected_chord.as_mut() else {
        return Outcome::unchanged();
    };
    let shapes = generate_voicings_within(
        &state.tuning,
        chord.root_note,
        &chord.quality,
        chord.root_fret,
        settings.max_fret,
    );
    if shapes.is_empty() {
        log::debug!(target: "explorer", "no alternative shape for {} {}", chord.root_note, chord.quality);
        return Outcome::unchanged();
    }

    let next = shapes
        .iter()
        .position(|v| *v == chord.voicing)
        .map_or(0, |i| (i + 1) % shapes.len());
    let voicing = shapes[next].clone();
    let used = voicing.strings();
    chord.muted = (0..state.tuning.len())
        .filter(|s| !used.contains(s))
        .collect::<BTreeSet<_>>();
    chord.voicing = voicing;
    Outcome::changed()
}

fn save_chord(state: &mut ExplorerState) -> Outcome {
    let Some(chord) = state.selected_chord.as_ref() else {
        return Outcome::unchanged();
    };
    let label = if chord.voicing.is_empty() {
        format!("{} {}", chord.root_note, chord.quality.short_name())
    } else {
        let positions: Vec<Position> = chord.voicing.positions().collect();
        identify_chord(chord.root_note, &positions, &state.tuning)
    };
    let saved = SavedChord {
        id: state.next_saved_id(),
        chord: chord.clone(),
        label,
    };
    state.saved_chords.push(saved);
    Outcome::changed()
}

/// Chord-relative state of one cell while a chord is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub pinned: bool,
    /// Only ever set on the nut cell.
    pub muted: bool,
    /// The cell the chord was started from.
    pub true_root: bool,
    pub playable: bool,
    /// Role relative to the chord root; drives ring colour.
    pub interval: IntervalType,
}

/// How prominently a cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Emphasis {
    Hidden,
    Faint,
    Normal,
    Strong,
}

/// Everything a front end needs to draw one fretboard cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub note: Note,
    /// Note name, interval degree, or "x" on a muted nut.
    pub label: String,
    pub in_scale: bool,
    pub scale_root: bool,
    pub emphasis: Emphasis,
    /// The cell's pitch class is the focused one.
    pub focused: bool,
    /// `None` when no chord is selected.
    pub chord: Option<CellState>,
}

/// Precomputed scale and candidate sets for drawing a whole fretboard.
pub struct FretboardView<'a> {
    state: &'a ExplorerState,
    scale: Vec<Note>,
    candidates: BTreeSet<Position>,
}

impl<'a> FretboardView<'a> {
    pub fn new(state: &'a ExplorerState, settings: &EngineSettings) -> Self {
        let candidates = state
            .selected_chord
            .as_ref()
            .map(|c| {
                playable_candidates_within(
                    &state.tuning,
                    c.root_note,
                    &c.quality,
                    c.root_fret,
                    settings.max_fret,
                )
            })
            .unwrap_or_default();
        Self {
            state,
            scale: scale_notes(state.root_note, &state.scale),
            candidates,
        }
    }

    /// `None` for a string the tuning does not have.
    pub fn cell(&self, position: Position) -> Option<Cell> {
        let base = *self.state.tuning.get(position.string)?;
        let note = note_on_fret(base, position.fret);
        let in_scale = is_in_scale(note, &self.scale);
        let scale_root = is_root(note, self.state.root_note);

        let selected = self.state.selected_chord.as_ref();
        let chord = selected.map(|c| self.chord_state(c, position, note));
        let mut emphasis = match (selected, chord) {
            (Some(_), Some(cs)) if cs.muted => Emphasis::Normal,
            (Some(_), Some(cs)) if cs.playable && cs.true_root => Emphasis::Strong,
            (Some(_), Some(cs)) if cs.playable => Emphasis::Normal,
            (Some(c), Some(_)) => {
                let string_taken =
                    c.is_muted(position.string) || c.voicing.on_string(position.string).is_some();
                if !string_taken && in_scale {
                    Emphasis::Faint
                } else {
                    Emphasis::Hidden
                }
            }
            _ if scale_root => Emphasis::Strong,
            _ if in_scale => Emphasis::Normal,
            _ if self.state.show_all_notes => Emphasis::Faint,
            _ => Emphasis::Hidden,
        };

        let focused = self.state.focused_note == Some(note);
        let muted = chord.is_some_and(|cs| cs.muted);
        if let Some(target) = self.state.focused_note {
            if !muted && emphasis != Emphasis::Hidden {
                emphasis = if target == note { Emphasis::Strong } else { Emphasis::Faint };
            }
        }

        let label = match (selected, self.state.chord_display_mode) {
            _ if muted => "x".to_string(),
            (Some(c), ChordDisplayMode::Interval) => interval_degree(c.root_note, note).to_string(),
            _ => note.name().to_string(),
        };

        Some(Cell {
            note,
            label,
            in_scale,
            scale_root,
            emphasis,
            focused,
            chord,
        })
    }

    fn chord_state(&self, chord: &SelectedChord, position: Position, note: Note) -> CellState {
        let string_muted = chord.is_muted(position.string);
        let string_pinned = chord.voicing.on_string(position.string).is_some();
        let pinned = chord.voicing.contains(position);
        CellState {
            pinned,
            muted: position.is_open() && string_muted,
            true_root: position == chord.anchor(),
            playable: if string_pinned || string_muted {
                pinned
            } else {
                self.candidates.contains(&position)
            },
            interval: interval_type(chord.root_note, note),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretvis_types::{ChordQuality, NutState, Scale};

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    fn apply(state: &mut ExplorerState, action: ExplorerAction) -> Outcome {
        reduce(&action, state, &settings())
    }

    fn click(state: &mut ExplorerState, string: usize, fret: u8) -> Outcome {
        apply(state, ExplorerAction::ClickNote(Position::new(string, fret)))
    }

    #[test]
    fn first_click_starts_a_suggested_chord() {
        let mut state = ExplorerState::new();
        // A string, fret 2: B in C major, a diminished triad.
        let outcome = click(&mut state, 1, 2);
        assert_eq!(outcome.preview, Some(Position::new(1, 2)));
        let chord = state.selected_chord.as_ref().unwrap();
        assert_eq!(chord.root_note, Note::B);
        assert_eq!(chord.quality, ChordQuality::Diminished);
        assert_eq!(chord.anchor(), Position::new(1, 2));
        assert!(chord.voicing.contains(Position::new(1, 2)));
    }

    #[test]
    fn fretted_chord_tone_replaces_pin_on_same_string() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3); // C major from the A string
        click(&mut state, 2, 2); // E
        click(&mut state, 2, 5); // G on the same string
        let chord = state.selected_chord.as_ref().unwrap();
        assert_eq!(chord.voicing.on_string(2), Some(Position::new(2, 5)));
        assert_eq!(chord.voicing.len(), 2);
    }

    #[test]
    fn fretted_pin_toggles_off() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        click(&mut state, 2, 2);
        let outcome = click(&mut state, 2, 2);
        assert!(outcome.changed);
        assert_eq!(outcome.preview, None);
        assert!(!state.selected_chord.unwrap().voicing.contains(Position::new(2, 2)));
    }

    #[test]
    fn nut_cycles_open_muted_free() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3); // C major
        let nut = |s: &ExplorerState| s.selected_chord.as_ref().unwrap().nut_state(3);

        assert_eq!(nut(&state), NutState::Free);
        assert!(click(&mut state, 3, 0).preview.is_some());
        assert_eq!(nut(&state), NutState::Open);
        click(&mut state, 3, 0);
        assert_eq!(nut(&state), NutState::Muted);
        click(&mut state, 3, 0);
        assert_eq!(nut(&state), NutState::Free);
        click(&mut state, 3, 0);
        assert_eq!(nut(&state), NutState::Open);
    }

    #[test]
    fn nut_click_on_non_chord_tone_still_cycles() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3); // C major; open D is not a chord tone
        click(&mut state, 2, 0);
        assert_eq!(state.selected_chord.as_ref().unwrap().nut_state(2), NutState::Open);
        assert_eq!(state.selected_chord.as_ref().unwrap().root_note, Note::C);
    }

    #[test]
    fn fretting_a_muted_string_unmutes_it() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        click(&mut state, 0, 0); // E open: pin
        click(&mut state, 0, 0); // mute
        assert!(state.selected_chord.as_ref().unwrap().is_muted(0));
        click(&mut state, 0, 3); // G on low E
        let chord = state.selected_chord.as_ref().unwrap();
        assert!(!chord.is_muted(0));
        assert!(chord.voicing.contains(Position::new(0, 3)));
    }

    #[test]
    fn non_chord_tone_restarts_unless_locked() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3); // C major
        click(&mut state, 1, 5); // D: not in C major
        assert_eq!(state.selected_chord.as_ref().unwrap().root_note, Note::D);

        apply(&mut state, ExplorerAction::ToggleLock);
        let outcome = click(&mut state, 1, 4); // C# not in D minor
        assert!(!outcome.changed);
        assert_eq!(state.selected_chord.as_ref().unwrap().root_note, Note::D);
    }

    #[test]
    fn locking_an_empty_voicing_fills_candidates() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        click(&mut state, 1, 3); // unpin the anchor
        assert!(state.selected_chord.as_ref().unwrap().voicing.is_empty());
        apply(&mut state, ExplorerAction::ToggleLock);
        let chord = state.selected_chord.as_ref().unwrap();
        let expected = playable_candidates_within(&state.tuning, Note::C, &ChordQuality::Major, 3, 24);
        assert_eq!(chord.voicing.positions().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn next_voicing_cycles_and_mutes_unused_strings() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        let shapes = generate_voicings_within(&state.tuning, Note::C, &ChordQuality::Major, 3, 24);
        assert!(shapes.len() > 1);

        apply(&mut state, ExplorerAction::NextVoicing);
        let chord = state.selected_chord.clone().unwrap();
        assert_eq!(chord.voicing, shapes[0]);
        for s in 0..6 {
            assert_eq!(chord.is_muted(s), chord.voicing.on_string(s).is_none());
        }

        apply(&mut state, ExplorerAction::NextVoicing);
        assert_eq!(state.selected_chord.as_ref().unwrap().voicing, shapes[1]);

        for _ in 1..shapes.len() {
            apply(&mut state, ExplorerAction::NextVoicing);
        }
        assert_eq!(state.selected_chord.as_ref().unwrap().voicing, shapes[0]);
    }

    #[test]
    fn next_voicing_without_shapes_is_a_no_op() {
        let mut state = ExplorerState::new();
        state.tuning = vec![Note::E];
        click(&mut state, 0, 8);
        let before = state.clone();
        let outcome = apply(&mut state, ExplorerAction::NextVoicing);
        assert!(!outcome.changed);
        assert_eq!(state, before);
    }

    #[test]
    fn save_load_delete() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        click(&mut state, 2, 2);
        click(&mut state, 5, 0);
        click(&mut state, 3, 0);
        apply(&mut state, ExplorerAction::SaveChord);
        assert_eq!(state.saved_chords.len(), 1);
        assert_eq!(state.saved_chords[0].label, "C Major");

        let id = state.saved_chords[0].id;
        apply(&mut state, ExplorerAction::ClearChord);
        assert!(state.selected_chord.is_none());
        apply(&mut state, ExplorerAction::LoadSaved(id));
        assert_eq!(state.selected_chord.as_ref(), Some(&state.saved_chords[0].chord));

        assert!(apply(&mut state, ExplorerAction::DeleteSaved(id)).changed);
        assert!(state.saved_chords.is_empty());
        assert!(!apply(&mut state, ExplorerAction::DeleteSaved(id)).changed);
    }

    #[test]
    fn clear_also_unlocks() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        apply(&mut state, ExplorerAction::ToggleLock);
        apply(&mut state, ExplorerAction::ClearChord);
        assert!(!state.is_locked);
    }

    #[test]
    fn string_count_loads_default_preset() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        apply(&mut state, ExplorerAction::SetStringCount(7));
        assert_eq!(state.num_strings, 7);
        assert_eq!(state.tuning[0], Note::A);
        assert!(state.selected_chord.is_none());

        assert!(!apply(&mut state, ExplorerAction::SetStringCount(12)).changed);
        assert_eq!(state.num_strings, 7);
    }

    #[test]
    fn presets_and_single_string_retune() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::ApplyPreset("Drop D".into()));
        assert_eq!(state.tuning[0], Note::D);
        assert!(!apply(&mut state, ExplorerAction::ApplyPreset("Drop A".into())).changed);
        apply(&mut state, ExplorerAction::SetStringTuning(5, Note::D));
        assert_eq!(state.tuning[5], Note::D);
        assert!(!apply(&mut state, ExplorerAction::SetStringTuning(6, Note::D)).changed);
    }

    #[test]
    fn scale_and_root_steer_suggestions() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::SetRoot(Note::A));
        apply(&mut state, ExplorerAction::SetScale(Scale::NaturalMinor.definition()));
        click(&mut state, 0, 0); // E in A minor: minor triad
        assert_eq!(state.selected_chord.as_ref().unwrap().quality, ChordQuality::Minor);
        apply(&mut state, ExplorerAction::SetQuality(ChordQuality::Major));
        assert_eq!(state.selected_chord.as_ref().unwrap().quality, ChordQuality::Major);
    }

    fn chord_cell(view: &FretboardView, string: usize, fret: u8) -> CellState {
        view.cell(Position::new(string, fret)).unwrap().chord.unwrap()
    }

    #[test]
    fn cells_follow_pins_and_candidates() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3); // C major anchored at A string fret 3
        click(&mut state, 0, 0);
        click(&mut state, 0, 0); // low E muted
        let view = FretboardView::new(&state, &settings());

        let anchor = chord_cell(&view, 1, 3);
        assert!(anchor.pinned && anchor.true_root && anchor.playable);
        assert_eq!(anchor.interval, IntervalType::Root);

        // Pinned string: only the pinned cell is playable.
        assert!(!chord_cell(&view, 1, 7).playable);

        let muted_nut = chord_cell(&view, 0, 0);
        assert!(muted_nut.muted && !muted_nut.playable);
        assert!(!chord_cell(&view, 0, 3).muted);

        // Free string: candidate membership decides.
        assert!(chord_cell(&view, 2, 2).playable);
        assert_eq!(chord_cell(&view, 2, 2).interval, IntervalType::Third);
        assert!(!chord_cell(&view, 2, 3).playable);
    }

    #[test]
    fn chord_cells_emphasis_and_labels() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        click(&mut state, 0, 0);
        click(&mut state, 0, 0);
        let view = FretboardView::new(&state, &settings());
        let at = |s, f| view.cell(Position::new(s, f)).unwrap();

        assert_eq!(at(1, 3).emphasis, Emphasis::Strong);
        assert_eq!(at(2, 2).emphasis, Emphasis::Normal);
        assert_eq!(at(0, 0).label, "x");
        assert_eq!(at(0, 0).emphasis, Emphasis::Normal);
        // Taken strings hide everything but their pin.
        assert_eq!(at(1, 5).emphasis, Emphasis::Hidden);
        assert_eq!(at(0, 3).emphasis, Emphasis::Hidden);
        // Free string, in scale but not playable: a ghost.
        assert_eq!(at(2, 0).emphasis, Emphasis::Faint);
        // Free string, outside the scale: hidden.
        assert_eq!(at(2, 1).emphasis, Emphasis::Hidden);
        assert_eq!(at(2, 2).label, "E");
    }

    #[test]
    fn interval_mode_labels_degrees() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        apply(&mut state, ExplorerAction::SetDisplayMode(ChordDisplayMode::Interval));
        let view = FretboardView::new(&state, &settings());
        let label = |s, f| view.cell(Position::new(s, f)).unwrap().label;
        assert_eq!(label(1, 3), "1");
        assert_eq!(label(2, 2), "3");
        assert_eq!(label(3, 0), "5");
        assert_eq!(label(2, 1), "b3");

        assert!(!apply(&mut state, ExplorerAction::SetDisplayMode(ChordDisplayMode::Interval)).changed);
    }

    #[test]
    fn interval_mode_needs_a_chord() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::SetDisplayMode(ChordDisplayMode::Interval));
        let view = FretboardView::new(&state, &settings());
        assert_eq!(view.cell(Position::new(1, 3)).unwrap().label, "C");
    }

    #[test]
    fn scale_cells_without_a_chord() {
        let mut state = ExplorerState::new();
        let view = FretboardView::new(&state, &settings());
        let c = view.cell(Position::new(1, 3)).unwrap();
        assert!(c.chord.is_none());
        assert!(c.scale_root && c.in_scale);
        assert_eq!(c.emphasis, Emphasis::Strong);
        assert_eq!(view.cell(Position::new(1, 2)).unwrap().emphasis, Emphasis::Normal);
        assert_eq!(view.cell(Position::new(1, 1)).unwrap().emphasis, Emphasis::Faint);
        assert!(view.cell(Position::new(6, 0)).is_none());

        apply(&mut state, ExplorerAction::ToggleShowAll);
        let view = FretboardView::new(&state, &settings());
        assert_eq!(view.cell(Position::new(1, 1)).unwrap().emphasis, Emphasis::Hidden);
        assert_eq!(view.cell(Position::new(1, 2)).unwrap().emphasis, Emphasis::Normal);
    }

    #[test]
    fn focus_dims_everything_else() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::ToggleFocus(Note::E));
        assert_eq!(state.focused_note, Some(Note::E));
        let view = FretboardView::new(&state, &settings());
        let e = view.cell(Position::new(0, 0)).unwrap();
        assert!(e.focused);
        assert_eq!(e.emphasis, Emphasis::Strong);
        // The scale root is dimmed too.
        assert_eq!(view.cell(Position::new(1, 3)).unwrap().emphasis, Emphasis::Faint);

        apply(&mut state, ExplorerAction::ToggleFocus(Note::E));
        assert_eq!(state.focused_note, None);
    }

    #[test]
    fn focus_switches_and_clicks_release_it() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::ToggleFocus(Note::E));
        apply(&mut state, ExplorerAction::ToggleFocus(Note::G));
        assert_eq!(state.focused_note, Some(Note::G));
        click(&mut state, 1, 3);
        assert_eq!(state.focused_note, None);

        apply(&mut state, ExplorerAction::SaveChord);
        let id = state.saved_chords[0].id;
        apply(&mut state, ExplorerAction::ToggleFocus(Note::C));
        apply(&mut state, ExplorerAction::LoadSaved(id));
        assert_eq!(state.focused_note, None);
    }

    #[test]
    fn locked_stray_click_still_releases_focus() {
        let mut state = ExplorerState::new();
        click(&mut state, 1, 3);
        apply(&mut state, ExplorerAction::ToggleLock);
        apply(&mut state, ExplorerAction::ToggleFocus(Note::D));
        let outcome = click(&mut state, 1, 5);
        assert!(outcome.changed);
        assert_eq!(outcome.preview, None);
        assert_eq!(state.focused_note, None);
        assert_eq!(state.selected_chord.as_ref().unwrap().root_note, Note::C);
    }

    #[test]
    fn preview_follows_setting() {
        let mut state = ExplorerState::new();
        apply(&mut state, ExplorerAction::ToggleNotePreview);
        assert!(!state.enable_note_preview);
        let outcome = click(&mut state, 1, 3);
        assert!(outcome.changed);
        assert_eq!(outcome.preview, None);
        assert!(state.selected_chord.is_some());

        apply(&mut state, ExplorerAction::ToggleNotePreview);
        assert_eq!(click(&mut state, 2, 2).preview, Some(Position::new(2, 2)));
    }
}
