use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pitch class in the 12-tone chromatic alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    #[serde(rename = "C#", alias = "Cs", alias = "Db")]
    Cs,
    D,
    #[serde(rename = "D#", alias = "Ds", alias = "Eb")]
    Ds,
    E,
    F,
    #[serde(rename = "F#", alias = "Fs", alias = "Gb")]
    Fs,
    G,
    #[serde(rename = "G#", alias = "Gs", alias = "Ab")]
    Gs,
    A,
    #[serde(rename = "A#", alias = "As", alias = "Bb")]
    As,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }

    /// Position in the chromatic alphabet, C = 0
    pub fn semitone(&self) -> u8 {
        *self as u8
    }

    /// Pitch class for any integer semitone count, floor-mod 12.
    pub fn from_semitone(semitone: i32) -> Note {
        Note::ALL[semitone.rem_euclid(12) as usize]
    }

    /// The note `offset` semitones above this one (negative offsets go down).
    pub fn transpose(&self, offset: i32) -> Note {
        Note::from_semitone(self.semitone() as i32 + offset)
    }

    /// Upward distance from `root` to this note, always in 0..12.
    pub fn interval_from(&self, root: Note) -> u8 {
        (self.semitone() as i32 - root.semitone() as i32).rem_euclid(12) as u8
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" => Ok(Note::C),
            "C#" | "Cs" | "Db" => Ok(Note::Cs),
            "D" => Ok(Note::D),
            "D#" | "Ds" | "Eb" => Ok(Note::Ds),
            "E" => Ok(Note::E),
            "F" => Ok(Note::F),
            "F#" | "Fs" | "Gb" => Ok(Note::Fs),
            "G" => Ok(Note::G),
            "G#" | "Gs" | "Ab" => Ok(Note::Gs),
            "A" => Ok(Note::A),
            "A#" | "As" | "Bb" => Ok(Note::As),
            "B" => Ok(Note::B),
            other => Err(format!("unknown note '{}'", other)),
        }
    }
}

/// Anything described by semitone offsets from an implicit root.
pub trait IntervalSet {
    fn intervals(&self) -> &[u8];
}

/// Built-in scales, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    Chromatic,
    Major,
    NaturalMinor,
    HarmonicMinor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
}

impl Scale {
    pub const ALL: [Scale; 12] = [
        Scale::Chromatic,
        Scale::Major,
        Scale::NaturalMinor,
        Scale::HarmonicMinor,
        Scale::MajorPentatonic,
        Scale::MinorPentatonic,
        Scale::Blues,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Locrian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Chromatic => "Chromatic",
            Scale::Major => "Major (Ionian)",
            Scale::NaturalMinor => "Natural Minor (Aeolian)",
            Scale::HarmonicMinor => "Harmonic Minor",
            Scale::MajorPentatonic => "Major Pentatonic",
            Scale::MinorPentatonic => "Minor Pentatonic",
            Scale::Blues => "Blues",
            Scale::Dorian => "Dorian",
            Scale::Phrygian => "Phrygian",
            Scale::Lydian => "Lydian",
            Scale::Mixolydian => "Mixolydian",
            Scale::Locrian => "Locrian",
        }
    }

    pub fn from_name(name: &str) -> Option<Scale> {
        Scale::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name) || format!("{:?}", s).eq_ignore_ascii_case(name))
    }

    pub fn definition(&self) -> ScaleDefinition {
        ScaleDefinition {
            name: self.name().to_string(),
            intervals: self.intervals().to_vec(),
        }
    }
}

impl IntervalSet for Scale {
    fn intervals(&self) -> &[u8] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
        }
    }
}

/// A named scale as the session holds it. Imported documents may carry scales
/// outside the built-in table, so this is a value record rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    pub name: String,
    pub intervals: Vec<u8>,
}

impl ScaleDefinition {
    /// Content identity: same offsets, regardless of name or order.
    pub fn same_intervals(&self, other: &impl IntervalSet) -> bool {
        let mut a: Vec<u8> = self.intervals.iter().map(|i| i % 12).collect();
        let mut b: Vec<u8> = other.intervals().iter().map(|i| i % 12).collect();
        a.sort_unstable();
        a.dedup();
        b.sort_unstable();
        b.dedup();
        a == b
    }

    /// The built-in scale with the same offsets, if any.
    pub fn builtin(&self) -> Option<Scale> {
        Scale::ALL.iter().copied().find(|s| self.same_intervals(s))
    }
}

impl Default for ScaleDefinition {
    fn default() -> Self {
        Scale::Major.definition()
    }
}

impl IntervalSet for ScaleDefinition {
    fn intervals(&self) -> &[u8] {
        &self.intervals
    }
}

/// Chord qualities. `ALL` is the lookup table order used by chord identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Power,
    Major7,
    Minor7,
    Dominant7,
    MajorAdd9,
    MinorAdd9,
    Sus2,
    Sus4,
    Diminished,
    Augmented,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 12] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Power,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Dominant7,
        ChordQuality::MajorAdd9,
        ChordQuality::MinorAdd9,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Power => "Power Chord",
            ChordQuality::Major7 => "Major 7",
            ChordQuality::Minor7 => "Minor 7",
            ChordQuality::Dominant7 => "Dominant 7",
            ChordQuality::MajorAdd9 => "Major add9",
            ChordQuality::MinorAdd9 => "Minor add9",
            ChordQuality::Sus2 => "Suspended 2",
            ChordQuality::Sus4 => "Suspended 4",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            ChordQuality::Major => "Maj",
            ChordQuality::Minor => "min",
            ChordQuality::Power => "5",
            ChordQuality::Major7 => "Maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::MajorAdd9 => "add9",
            ChordQuality::MinorAdd9 => "madd9",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
        }
    }

    /// The table entry with exactly these offsets, in any order.
    pub fn from_intervals(intervals: &[u8]) -> Option<ChordQuality> {
        let mut wanted: Vec<u8> = intervals.iter().map(|i| i % 12).collect();
        wanted.sort_unstable();
        wanted.dedup();
        ChordQuality::ALL.iter().copied().find(|q| q.intervals() == wanted.as_slice())
    }

    /// Looks up by display name, short name or identifier.
    pub fn from_name(name: &str) -> Option<ChordQuality> {
        ChordQuality::ALL.iter().copied().find(|q| {
            q.name().eq_ignore_ascii_case(name)
                || q.short_name() == name
                || format!("{:?}", q).eq_ignore_ascii_case(name)
        })
    }
}

impl IntervalSet for ChordQuality {
    fn intervals(&self) -> &[u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Power => &[0, 7],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::MajorAdd9 => &[0, 2, 4, 7],
            ChordQuality::MinorAdd9 => &[0, 2, 3, 7],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
        }
    }
}

// Written as a `{name, shortName, intervals}` record so documents stay readable by
// other tools; read back from either that record or a bare identifier.
impl Serialize for ChordQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("ChordQuality", 3)?;
        record.serialize_field("name", self.name())?;
        record.serialize_field("shortName", self.short_name())?;
        record.serialize_field("intervals", self.intervals())?;
        record.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QualityRepr {
    Identifier(String),
    Record {
        #[serde(default)]
        name: Option<String>,
        intervals: Vec<u8>,
    },
}

impl<'de> Deserialize<'de> for ChordQuality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match QualityRepr::deserialize(deserializer)? {
            QualityRepr::Identifier(id) => ChordQuality::from_name(&id)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown chord quality '{}'", id))),
            // Content decides; the name is only for the error message.
            QualityRepr::Record { name, intervals } => ChordQuality::from_intervals(&intervals)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "no chord quality with intervals {:?} ({})",
                        intervals,
                        name.unwrap_or_default()
                    ))
                }),
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn note_all_has_12() {
        assert_eq!(Note::ALL.len(), 12);
    }

    #[test]
    fn note_names_unique() {
        let names: HashSet<&str> = Note::ALL.iter().map(|n| n.name()).collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn note_semitones_0_to_11() {
        let semitones: Vec<u8> = Note::ALL.iter().map(|n| n.semitone()).collect();
        assert_eq!(semitones, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn transpose_wraps_both_ways() {
        assert_eq!(Note::A.transpose(3), Note::C);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::E.transpose(24), Note::E);
        assert_eq!(Note::G.transpose(-19), Note::C);
    }

    #[test]
    fn interval_from_is_upward() {
        assert_eq!(Note::E.interval_from(Note::C), 4);
        assert_eq!(Note::C.interval_from(Note::E), 8);
        assert_eq!(Note::D.interval_from(Note::D), 0);
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("C#".parse::<Note>(), Ok(Note::Cs));
        assert_eq!("Fs".parse::<Note>(), Ok(Note::Fs));
        assert_eq!("Bb".parse::<Note>(), Ok(Note::As));
        assert!("H".parse::<Note>().is_err());
    }

    #[test]
    fn note_serializes_as_symbol() {
        let json = serde_json::to_string(&Note::Gs).unwrap();
        assert_eq!(json, "\"G#\"");
        let back: Note = serde_json::from_str("\"Eb\"").unwrap();
        assert_eq!(back, Note::Ds);
    }

    #[test]
    fn chord_quality_serializes_as_record() {
        let json = serde_json::to_value(ChordQuality::Dominant7).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Dominant 7", "shortName": "7", "intervals": [0, 4, 7, 10]})
        );
        let back: ChordQuality = serde_json::from_value(json).unwrap();
        assert_eq!(back, ChordQuality::Dominant7);
    }

    #[test]
    fn chord_quality_reads_identifier_or_record() {
        let by_id: ChordQuality = serde_json::from_str("\"Sus4\"").unwrap();
        assert_eq!(by_id, ChordQuality::Sus4);

        // Renamed but same content: content wins.
        let renamed: ChordQuality =
            serde_json::from_str(r#"{"name": "maj", "shortName": "M", "intervals": [7, 0, 4]}"#).unwrap();
        assert_eq!(renamed, ChordQuality::Major);

        let unknown = serde_json::from_str::<ChordQuality>(r#"{"name": "Weird", "intervals": [0, 1, 2]}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn chord_quality_from_intervals_matches_every_entry() {
        for q in ChordQuality::ALL {
            assert_eq!(ChordQuality::from_intervals(q.intervals()), Some(q));
        }
        assert_eq!(ChordQuality::from_intervals(&[0, 4]), None);
    }

    #[test]
    fn scale_all_has_12() {
        assert_eq!(Scale::ALL.len(), 12);
    }

    #[test]
    fn scale_intervals_start_at_root_and_are_distinct() {
        for scale in Scale::ALL {
            let intervals = scale.intervals();
            assert_eq!(intervals[0], 0, "{} must contain the root", scale.name());
            let unique: HashSet<u8> = intervals.iter().copied().collect();
            assert_eq!(unique.len(), intervals.len(), "{}", scale.name());
        }
    }

    #[test]
    fn scale_lookup_by_name() {
        assert_eq!(Scale::from_name("Major (Ionian)"), Some(Scale::Major));
        assert_eq!(Scale::from_name("harmonicminor"), Some(Scale::HarmonicMinor));
        assert_eq!(Scale::from_name("Nope"), None);
    }

    #[test]
    fn scale_definition_identity_ignores_name_and_order() {
        let custom = ScaleDefinition {
            name: "My Mode".into(),
            intervals: vec![11, 9, 7, 5, 4, 2, 0],
        };
        assert!(custom.same_intervals(&Scale::Major));
        assert_eq!(custom.builtin(), Some(Scale::Major));

        let renamed_minor = ScaleDefinition {
            name: "Major (Ionian)".into(),
            intervals: Scale::NaturalMinor.intervals().to_vec(),
        };
        assert!(!renamed_minor.same_intervals(&Scale::Major));
    }

    #[test]
    fn chord_table_order() {
        assert_eq!(ChordQuality::ALL[0], ChordQuality::Major);
        assert_eq!(ChordQuality::ALL[2], ChordQuality::Power);
        assert_eq!(ChordQuality::ALL[11], ChordQuality::Augmented);
    }

    #[test]
    fn chord_short_names_unique() {
        let names: HashSet<&str> = ChordQuality::ALL.iter().map(|q| q.short_name()).collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn chord_lookup_by_any_name() {
        assert_eq!(ChordQuality::from_name("Dominant 7"), Some(ChordQuality::Dominant7));
        assert_eq!(ChordQuality::from_name("m7"), Some(ChordQuality::Minor7));
        assert_eq!(ChordQuality::from_name("sus4"), Some(ChordQuality::Sus4));
        assert_eq!(ChordQuality::from_name("power"), Some(ChordQuality::Power));
        assert_eq!(ChordQuality::from_name("Nine"), None);
    }
}
