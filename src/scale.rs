//! Scale tables: the ordered set of notes a run is allowed to play.
//!
//! Tables are built from a scale name such as `"A minor blues"` and an inclusive
//! note range such as `A3`..`A6`. Every entry carries its MIDI number and its
//! equal-temperament frequency so both quantizers can work off the same table.

use crate::error::{Result, SonifyError};
use std::fmt;

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single MIDI note, C4 = 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note(u8);

impl Note {
    pub fn from_midi(midi: u8) -> Option<Note> {
        (midi <= 127).then_some(Note(midi))
    }

    /// Parses scientific pitch notation: `A3`, `C#4`, `Eb5`, `C-1`.
    pub fn parse(name: &str) -> Result<Note> {
        let invalid = || SonifyError::InvalidNote(name.to_string());
        let trimmed = name.trim();
        let mut chars = trimmed.chars();

        let letter = chars.next().ok_or_else(invalid)?;
        let mut pitch_class: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let accidentals = rest.len() - rest.trim_start_matches(['#', 'b']).len();
        for accidental in rest[..accidentals].chars() {
            pitch_class += if accidental == '#' { 1 } else { -1 };
        }

        let octave: i32 = rest[accidentals..].parse().map_err(|_| invalid())?;
        let midi = (octave + 1) * 12 + pitch_class;
        u8::try_from(midi)
            .ok()
            .and_then(Note::from_midi)
            .ok_or_else(invalid)
    }

    pub fn midi(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    pub fn octave(self) -> i32 {
        i32::from(self.0 / 12) - 1
    }

    /// Equal temperament, A4 = 440 Hz.
    pub fn frequency(self) -> f64 {
        440.0 * 2f64.powf((f64::from(self.0) - 69.0) / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            PITCH_NAMES[usize::from(self.pitch_class())],
            self.octave()
        )
    }
}

/// Interval sets for the supported scale kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    MajorPentatonic,
    MinorPentatonic,
    MinorBlues,
    MajorBlues,
    Chromatic,
}

impl ScaleKind {
    pub fn parse(name: &str) -> Option<ScaleKind> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = match normalized.to_ascii_lowercase().as_str() {
            "major" | "ionian" => ScaleKind::Major,
            "minor" | "aeolian" => ScaleKind::Minor,
            "dorian" => ScaleKind::Dorian,
            "phrygian" => ScaleKind::Phrygian,
            "lydian" => ScaleKind::Lydian,
            "mixolydian" => ScaleKind::Mixolydian,
            "locrian" => ScaleKind::Locrian,
            "pentatonic" | "major pentatonic" => ScaleKind::MajorPentatonic,
            "minor pentatonic" => ScaleKind::MinorPentatonic,
            "blues" | "minor blues" => ScaleKind::MinorBlues,
            "major blues" => ScaleKind::MajorBlues,
            "chromatic" => ScaleKind::Chromatic,
            _ => return None,
        };
        Some(kind)
    }

    /// Semitone intervals from the tonic
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ScaleKind::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleKind::Minor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleKind::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleKind::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleKind::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleKind::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleKind::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            ScaleKind::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleKind::MinorPentatonic => &[0, 3, 5, 7, 10],
            ScaleKind::MinorBlues => &[0, 3, 5, 6, 7, 10],
            ScaleKind::MajorBlues => &[0, 2, 3, 4, 7, 9],
            ScaleKind::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }
}

/// One playable note and the frequency it is matched against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEntry {
    pub note: Note,
    pub frequency: f64,
}

impl From<Note> for ScaleEntry {
    fn from(note: Note) -> Self {
        ScaleEntry {
            note,
            frequency: note.frequency(),
        }
    }
}

/// Ordered, non-empty, read-only table of notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTable {
    name: String,
    entries: Vec<ScaleEntry>,
}

impl ScaleTable {
    /// Every note of `scale` between `low` and `high`, both inclusive, ascending.
    pub fn range(scale: &str, low: &str, high: &str) -> Result<ScaleTable> {
        let unknown = || SonifyError::UnknownScale(scale.to_string());
        let (tonic, kind) = scale.trim().split_once(' ').ok_or_else(unknown)?;
        let kind = ScaleKind::parse(kind).ok_or_else(unknown)?;
        // The tonic is a pitch class; borrow the note parser with a dummy octave.
        let tonic = Note::parse(&format!("{}4", tonic)).map_err(|_| unknown())?;

        let low_note = Note::parse(low)?;
        let high_note = Note::parse(high)?;

        let entries: Vec<ScaleEntry> = (low_note.midi()..=high_note.midi())
            .filter_map(Note::from_midi)
            .filter(|note| {
                let degree = (note.pitch_class() + 12 - tonic.pitch_class()) % 12;
                kind.intervals().contains(&degree)
            })
            .map(ScaleEntry::from)
            .collect();

        if entries.is_empty() {
            return Err(SonifyError::EmptyScale {
                name: scale.to_string(),
                low: low.to_string(),
                high: high.to_string(),
            });
        }

        Ok(ScaleTable {
            name: format!("{} {}-{}", scale.trim(), low_note, high_note),
            entries,
        })
    }

    /// Wraps externally supplied entries. `None` if there are none.
    pub fn from_entries(name: &str, entries: Vec<ScaleEntry>) -> Option<ScaleTable> {
        if entries.is_empty() {
            return None;
        }
        Some(ScaleTable {
            name: name.to_string(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signed lookup. Anything outside `[0, len)` is a miss rather than a fault.
    pub fn get(&self, index: i64) -> Option<Note> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(|entry| entry.note)
    }

    pub fn entries(&self) -> &[ScaleEntry] {
        &self.entries
    }

    pub fn first(&self) -> &ScaleEntry {
        // Constructors refuse empty tables
        &self.entries[0]
    }

    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.entries.iter().map(|entry| entry.note)
    }
}
