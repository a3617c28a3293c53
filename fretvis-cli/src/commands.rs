//! Subcommands. Each one returns the text to print so it can be tested without a terminal.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

use fretvis_core::config::{Config, EngineSettings};
use fretvis_core::explorer::{reduce, FretboardView};
use fretvis_core::persistence::{self, PersistError};
use fretvis_core::playback::{strum, strum_plan, Player, StrumNote};
use fretvis_core::theory::{
    chord_notes, generate_voicings_within, identify_chord, note_on_fret, scale_notes,
    suggest_chord_quality,
};
use fretvis_types::{
    preset_name, tuning_presets, ChordDisplayMode, ChordQuality, ExplorerAction, ExplorerState,
    Note, Position, Scale, SelectedChord, MAX_STRINGS, MIN_STRINGS,
};

use crate::render::fretboard;

pub const USAGE: &str = "\
usage: fretvis [--verbose] [--log-stderr] <command>

commands:
  scale <root> [scale name] [--focus NOTE] [--scale-only]
                                                 notes of a scale across the neck
  chord <root> <quality> [--fret N] [--tuning E,A,D,G,B,E] [--pin] [--intervals]
        [--focus NOTE] [--strum]                 candidates and ranked voicings
  identify <root> <string-fret>... [--tuning ...] name a set of positions
  suggest <note> [--key ROOT] [--scale NAME]     triad quality for a scale degree
  presets [strings]                              tuning presets
  export <path>                                  write the configured session as JSON
  import <path>                                  read and summarise a JSON session";

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Persist(PersistError),
}

impl From<PersistError> for CliError {
    fn from(e: PersistError) -> Self {
        Self::Persist(e)
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{}\n\n{}", msg, USAGE),
            Self::Persist(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

/// Flags that take a value.
const VALUE_FLAGS: [&str; 5] = ["--fret", "--tuning", "--key", "--scale", "--focus"];

/// Command-line words minus global flags, options and option values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip = true;
        } else if !arg.starts_with("--") && arg != "-v" {
            out.push(arg.as_str());
        }
    }
    out
}

fn option<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_note(s: &str) -> Result<Note, CliError> {
    s.parse().map_err(usage)
}

fn parse_tuning(s: &str) -> Result<Vec<Note>, CliError> {
    s.split(',').map(parse_note).collect()
}

fn flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn tuning_for(args: &[String], session: &ExplorerState) -> Result<Vec<Note>, CliError> {
    match option(args, "--tuning") {
        Some(list) => parse_tuning(list),
        None => Ok(session.tuning.clone()),
    }
}

pub fn run(args: &[String], config: &Config) -> Result<String, CliError> {
    let words = positionals(args);
    let session = config.defaults();
    let settings = config.engine();

    match words.as_slice() {
        ["scale", root, name @ ..] => scale(args, parse_note(root)?, &name.join(" "), &session, &settings),
        ["chord", root, quality] => chord(args, parse_note(root)?, quality, &session, &settings),
        ["identify", root, cells @ ..] => identify(args, parse_note(root)?, cells, &session),
        ["suggest", note] => suggest(args, parse_note(note)?, &session),
        ["presets"] => Ok(presets(MIN_STRINGS..=MAX_STRINGS)),
        ["presets", count] => {
            let n: usize = count.parse().map_err(|_| usage(format!("not a string count: '{}'", count)))?;
            if tuning_presets(n).is_empty() {
                return Err(usage(format!("no presets for {} strings", n)));
            }
            Ok(presets(n..=n))
        }
        ["export", path] => {
            persistence::save_to_file(&session, Path::new(path))?;
            Ok(format!("exported to {}", path))
        }
        ["import", path] => {
            let mut state = session.clone();
            persistence::load_from_file(Path::new(path), &mut state)?;
            Ok(summary(&state))
        }
        [] => Err(usage("no command given")),
        [other, ..] => Err(usage(format!("unknown command or arguments: '{}'", other))),
    }
}

/// Applies the view flags shared by `scale` and `chord` to a scratch session.
fn apply_view_flags(
    args: &[String],
    state: &mut ExplorerState,
    settings: &EngineSettings,
) -> Result<(), CliError> {
    if let Some(note) = option(args, "--focus") {
        reduce(&ExplorerAction::ToggleFocus(parse_note(note)?), state, settings);
    }
    if flag(args, "--scale-only") && state.show_all_notes {
        reduce(&ExplorerAction::ToggleShowAll, state, settings);
    }
    if flag(args, "--intervals") {
        reduce(&ExplorerAction::SetDisplayMode(ChordDisplayMode::Interval), state, settings);
    }
    Ok(())
}

fn scale(
    args: &[String],
    root: Note,
    name: &str,
    session: &ExplorerState,
    settings: &EngineSettings,
) -> Result<String, CliError> {
    let definition = if name.is_empty() {
        session.scale.clone()
    } else {
        Scale::from_name(name)
            .map(|s| s.definition())
            .ok_or_else(|| usage(format!("unknown scale '{}'", name)))?
    };
    let notes = scale_notes(root, &definition);

    let mut state = session.clone();
    reduce(&ExplorerAction::SetRoot(root), &mut state, settings);
    reduce(&ExplorerAction::SetScale(definition.clone()), &mut state, settings);
    apply_view_flags(args, &mut state, settings)?;

    let mut out = String::new();
    let names: Vec<&str> = notes.iter().map(|n| n.name()).collect();
    let _ = writeln!(out, "{} {}: {}", root, definition.name, names.join(" "));
    let view = FretboardView::new(&state, settings);
    out.push_str(&fretboard(&state.tuning, 12.min(settings.max_fret), |p| view.cell(p).into()));
    Ok(out)
}

/// Root position closest to `fret`, lowest string first on ties.
fn nearest_root(tuning: &[Note], root: Note, fret: u8, max_fret: u8) -> Option<Position> {
    tuning
        .iter()
        .enumerate()
        .flat_map(|(string, &base)| {
            (0..=max_fret)
                .filter(move |&f| note_on_fret(base, f) == root)
                .map(move |f| Position::new(string, f))
        })
        .min_by_key(|p| p.fret.abs_diff(fret))
}

fn chord(
    args: &[String],
    root: Note,
    quality: &str,
    session: &ExplorerState,
    settings: &EngineSettings,
) -> Result<String, CliError> {
    let quality = ChordQuality::from_name(quality)
        .ok_or_else(|| usage(format!("unknown chord quality '{}'", quality)))?;
    let tuning = tuning_for(args, session)?;
    let fret = match option(args, "--fret") {
        Some(f) => f.parse::<u8>().map_err(|_| usage(format!("not a fret: '{}'", f)))?,
        None => 0,
    };

    let tones = chord_notes(root, &quality);
    let voicings = generate_voicings_within(&tuning, root, &quality, fret, settings.max_fret);

    // A scratch session holding the chord as if the root had been clicked, or
    // with the best shape pinned under --pin.
    let mut state = session.clone();
    state.num_strings = tuning.len();
    state.tuning = tuning.clone();
    state.selected_chord = match (flag(args, "--pin"), voicings.first()) {
        (true, Some(best)) => best.positions().next().map(|anchor| {
            let mut chord = SelectedChord::new(root, quality, anchor);
            let used = best.strings();
            chord.muted = (0..tuning.len()).filter(|s| !used.contains(s)).collect();
            chord.voicing = best.clone();
            chord
        }),
        _ => nearest_root(&tuning, root, fret, settings.max_fret)
            .map(|anchor| SelectedChord::new(root, quality, anchor)),
    };
    apply_view_flags(args, &mut state, settings)?;

    let mut out = String::new();
    let names: Vec<&str> = tones.iter().map(|n| n.name()).collect();
    let _ = writeln!(out, "{} {} ({}): {}", root, quality.name(), quality.short_name(), names.join(" "));
    let last = fret.saturating_add(4).max(12).min(settings.max_fret);
    let view = FretboardView::new(&state, settings);
    out.push_str(&fretboard(&tuning, last, |p| view.cell(p).into()));

    if voicings.is_empty() {
        let _ = writeln!(out, "\nno playable voicing on this tuning");
        return Ok(out);
    }
    let _ = writeln!(out, "\nvoicings nearest fret {}:", fret);
    for (i, voicing) in voicings.iter().enumerate() {
        let positions: Vec<Position> = voicing.positions().collect();
        let _ = writeln!(
            out,
            "{:>3}. {}  {}  (avg fret {:.1})",
            i + 1,
            voicing,
            identify_chord(root, &positions, &tuning),
            voicing.average_fret()
        );
    }

    if flag(args, "--strum") {
        let best = &voicings[0];
        let used = best.strings();
        let muted: BTreeSet<usize> = (0..tuning.len()).filter(|s| !used.contains(s)).collect();
        let plan = strum_plan(&tuning, best, &muted, settings.a4, settings.stagger_ms);
        let mut player = TextPlayer::default();
        strum(&mut player, &plan);
        let _ = writeln!(out, "\nstrum:");
        for line in player.lines {
            let _ = writeln!(out, "  {}", line);
        }
    }
    Ok(out)
}

fn identify(
    args: &[String],
    root: Note,
    cells: &[&str],
    session: &ExplorerState,
) -> Result<String, CliError> {
    let tuning = tuning_for(args, session)?;
    let positions = cells
        .iter()
        .map(|c| c.parse::<Position>().map_err(usage))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(p) = positions.iter().find(|p| p.string >= tuning.len()) {
        return Err(usage(format!("{} is off a {}-string tuning", p, tuning.len())));
    }
    Ok(identify_chord(root, &positions, &tuning))
}

fn suggest(args: &[String], note: Note, session: &ExplorerState) -> Result<String, CliError> {
    let key = match option(args, "--key") {
        Some(k) => parse_note(k)?,
        None => session.root_note,
    };
    let definition = match option(args, "--scale") {
        Some(name) => Scale::from_name(name)
            .map(|s| s.definition())
            .ok_or_else(|| usage(format!("unknown scale '{}'", name)))?,
        None => session.scale.clone(),
    };
    let quality = suggest_chord_quality(note, &scale_notes(key, &definition));
    Ok(format!("{} {} in {} {}", note, quality.name(), key, definition.name))
}

fn presets(counts: std::ops::RangeInclusive<usize>) -> String {
    let mut out = String::new();
    for count in counts {
        let _ = writeln!(out, "{} strings:", count);
        for preset in tuning_presets(count) {
            let notes: Vec<&str> = preset.notes.iter().map(|n| n.name()).collect();
            let _ = writeln!(out, "  {:<18} {}", preset.name, notes.join(" "));
        }
    }
    out
}

fn summary(state: &ExplorerState) -> String {
    let notes: Vec<&str> = state.tuning.iter().map(|n| n.name()).collect();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} strings, {} ({})",
        state.num_strings,
        notes.join(" "),
        preset_name(&state.tuning).unwrap_or("custom")
    );
    let _ = writeln!(out, "key {} {}, theme {}", state.root_note, state.scale.name, state.theme);
    for saved in &state.saved_chords {
        let _ = writeln!(out, "  #{} {}  {}", saved.id, saved.label, saved.chord.voicing);
    }
    out
}

/// Prints instead of sounding.
#[derive(Default)]
struct TextPlayer {
    lines: Vec<String>,
}

impl Player for TextPlayer {
    fn schedule(&mut self, note: &StrumNote) {
        self.lines.push(format!(
            "+{:>4} ms  string {}  {:.2} Hz",
            note.delay_ms, note.string, note.frequency
        ));
    }
}
