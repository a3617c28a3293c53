//! JSON export and import of the explorer configuration.
//!
//! The export document is the camelCase serialization of `ExplorerState` plus an
//! `exportedAt` stamp. Imports merge over the current state and always leave the
//! session with no selected chord and unlocked.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use fretvis_types::ExplorerState;

/// Fields an imported document must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["numStrings", "tuning", "rootNote", "scale", "theme"];

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Input was empty or whitespace only.
    Empty,
    NotAnObject,
    MissingField(&'static str),
    Invalid(String),
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json(e) => write!(f, "Invalid JSON format: {}", e),
            Self::Empty => write!(f, "Nothing to import"),
            Self::NotAnObject => write!(f, "Invalid configuration format: expected a JSON object"),
            Self::MissingField(name) => write!(f, "Missing required field: {}", name),
            Self::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for PersistError {}

pub fn export_json(state: &ExplorerState) -> Result<String, PersistError> {
    let mut doc = match serde_json::to_value(state)? {
        Value::Object(map) => map,
        _ => return Err(PersistError::NotAnObject),
    };
    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    doc.insert("exportedAt".to_string(), Value::from(exported_at));
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

/// Merges the document in `text` over `state`.
///
/// On error `state` is left untouched.
pub fn import_json(text: &str, state: &mut ExplorerState) -> Result<(), PersistError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PersistError::Empty);
    }
    let imported: Map<String, Value> = match serde_json::from_str(text)? {
        Value::Object(map) => map,
        _ => return Err(PersistError::NotAnObject),
    };
    for field in REQUIRED_FIELDS {
        if !imported.contains_key(field) {
            return Err(PersistError::MissingField(field));
        }
    }

    let mut merged = match serde_json::to_value(&*state)? {
        Value::Object(map) => map,
        _ => return Err(PersistError::NotAnObject),
    };
    merged.extend(imported);
    // Selection, lock and focus never survive an import, so whatever the
    // document says about them is not read.
    merged.insert("selectedChord".into(), Value::Null);
    merged.insert("isLocked".into(), Value::Bool(false));
    merged.insert("focusedNote".into(), Value::Null);

    let next: ExplorerState = serde_json::from_value(Value::Object(merged))
        .map_err(|e| PersistError::Invalid(e.to_string()))?;
    if next.tuning.len() != next.num_strings {
        return Err(PersistError::Invalid(format!(
            "tuning has {} strings but numStrings is {}",
            next.tuning.len(),
            next.num_strings
        )));
    }

    log::info!(
        target: "import",
        "imported {}-string config in {} {}",
        next.num_strings,
        next.root_note,
        next.scale.name
    );
    *state = next;
    Ok(())
}

pub fn save_to_file(state: &ExplorerState, path: &Path) -> Result<(), PersistError> {
    std::fs::write(path, export_json(state)?)?;
    Ok(())
}

pub fn load_from_file(path: &Path, state: &mut ExplorerState) -> Result<(), PersistError> {
    let text = std::fs::read_to_string(path)?;
    import_json(&text, state).map_err(|e| {
        log::warn!(target: "import", "rejected {}: {}", path.display(), e);
        e
    })
}
