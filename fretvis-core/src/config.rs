use std::path::{Path, PathBuf};

use serde::Deserialize;

use fretvis_types::{
    find_preset, tuning_presets, ChordDisplayMode, ExplorerState, Note, Scale, ScaleDefinition,
    TOTAL_FRETS,
};

use crate::playback::{DEFAULT_A4, DEFAULT_STAGGER_MS};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    playback: PlaybackConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    strings: Option<usize>,
    tuning: Option<String>,
    root: Option<String>,
    scale: Option<String>,
    theme: Option<String>,
    show_all_notes: Option<bool>,
    chord_labels: Option<String>,
    note_preview: Option<bool>,
}

#[derive(Deserialize, Default)]
struct EngineConfig {
    max_fret: Option<u8>,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    a4: Option<f64>,
    stagger_ms: Option<u32>,
}

/// Knobs the engine and playback planner read on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub max_fret: u8,
    pub a4: f64,
    pub stagger_ms: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_fret: TOTAL_FRETS,
            a4: DEFAULT_A4,
            stagger_ms: DEFAULT_STAGGER_MS,
        }
    }
}

pub struct Config {
    defaults: DefaultsConfig,
    engine: EngineConfig,
    playback: PlaybackConfig,
}

impl Config {
    /// Embedded defaults overlaid with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_with(user_config_path().as_deref())
    }

    pub fn load_with(user_path: Option<&Path>) -> Self {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::warn!(target: "config", "embedded config.toml is malformed: {}", e);
            ConfigFile::default()
        });

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_defaults(&mut base.defaults, user.defaults);
                            merge_engine(&mut base.engine, user.engine);
                            merge_playback(&mut base.playback, user.playback);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            engine: base.engine,
            playback: base.playback,
        }
    }

    /// A fresh session built from the configured defaults.
    pub fn defaults(&self) -> ExplorerState {
        let fallback = ExplorerState::new();

        let num_strings = match self.defaults.strings {
            Some(n) if !tuning_presets(n).is_empty() => n,
            Some(n) => {
                log::warn!(target: "config", "unsupported string count {}, using {}", n, fallback.num_strings);
                fallback.num_strings
            }
            None => fallback.num_strings,
        };
        let tuning = self
            .defaults
            .tuning
            .as_deref()
            .and_then(|name| find_preset(num_strings, name))
            .or_else(|| tuning_presets(num_strings).first())
            .map(|p| p.notes.to_vec())
            .unwrap_or(fallback.tuning);

        ExplorerState {
            num_strings,
            tuning,
            root_note: self
                .defaults
                .root
                .as_deref()
                .and_then(parse_note)
                .unwrap_or(fallback.root_note),
            scale: self
                .defaults
                .scale
                .as_deref()
                .and_then(parse_scale)
                .unwrap_or(fallback.scale),
            show_all_notes: self.defaults.show_all_notes.unwrap_or(fallback.show_all_notes),
            theme: self.defaults.theme.clone().unwrap_or(fallback.theme),
            chord_display_mode: match self.defaults.chord_labels.as_deref() {
                Some(text) => parse_display_mode(text).unwrap_or_else(|| {
                    log::warn!(target: "config", "unknown chord_labels '{}', using note names", text);
                    fallback.chord_display_mode
                }),
                None => fallback.chord_display_mode,
            },
            enable_note_preview: self.defaults.note_preview.unwrap_or(fallback.enable_note_preview),
            ..fallback
        }
    }

    pub fn engine(&self) -> EngineSettings {
        let fallback = EngineSettings::default();
        EngineSettings {
            max_fret: self
                .engine
                .max_fret
                .map(|f| f.clamp(1, TOTAL_FRETS))
                .unwrap_or(fallback.max_fret),
            a4: self
                .playback
                .a4
                .filter(|a| a.is_finite() && *a > 0.0)
                .unwrap_or(fallback.a4),
            stagger_ms: self.playback.stagger_ms.unwrap_or(fallback.stagger_ms),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fretvis").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.strings.is_some() {
        base.strings = user.strings;
        // A tuning preset only makes sense for the count it was written for.
        base.tuning = None;
    }
    if user.tuning.is_some() {
        base.tuning = user.tuning;
    }
    if user.root.is_some() {
        base.root = user.root;
    }
    if user.scale.is_some() {
        base.scale = user.scale;
    }
    if user.theme.is_some() {
        base.theme = user.theme;
    }
    if user.show_all_notes.is_some() {
        base.show_all_notes = user.show_all_notes;
    }
    if user.chord_labels.is_some() {
        base.chord_labels = user.chord_labels;
    }
    if user.note_preview.is_some() {
        base.note_preview = user.note_preview;
    }
}

fn merge_engine(base: &mut EngineConfig, user: EngineConfig) {
    if user.max_fret.is_some() {
        base.max_fret = user.max_fret;
    }
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.a4.is_some() {
        base.a4 = user.a4;
    }
    if user.stagger_ms.is_some() {
        base.stagger_ms = user.stagger_ms;
    }
}

fn parse_note(s: &str) -> Option<Note> {
    s.trim().parse().ok()
}

fn parse_scale(s: &str) -> Option<ScaleDefinition> {
    Scale::from_name(s.trim()).map(|scale| scale.definition())
}

fn parse_display_mode(s: &str) -> Option<ChordDisplayMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "note" | "notes" => Some(ChordDisplayMode::Note),
        "interval" | "intervals" => Some(ChordDisplayMode::Interval),
        _ => None,
    }
}
