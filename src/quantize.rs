//! Mapping raw data values onto scale notes.
//!
//! Two strategies exist. The delta quantizer drives the flight voices: small
//! values move by their change from the previous sample while values larger
//! than the scale fold back into it. The frequency quantizer drives the weather
//! melody by snapping a magnitude to the closest pitch in the table.

use crate::scale::{Note, ScaleTable};

/// Index into a scale of length `scale_len` for `current`, given the previous raw value.
///
/// Values above the scale length wrap with `current % scale_len` and always land
/// in `[0, scale_len)`. Everything else yields the signed delta `current - previous`,
/// which may fall outside the table; see [`lookup_or_hold`].
pub fn delta_index(current: i64, previous: i64, scale_len: usize) -> i64 {
    let len = scale_len as i64;
    if len > 0 && current > len {
        current % len
    } else {
        current - previous
    }
}

/// Scale note at `index`, or the previously chosen note when the index misses the table.
pub fn lookup_or_hold(scale: &ScaleTable, index: i64, previous: Option<Note>) -> Option<Note> {
    scale.get(index).or(previous)
}

/// The entry whose frequency is closest to `target`. Ties keep the earliest entry.
pub fn nearest_note(target: f64, scale: &ScaleTable) -> Note {
    let first = scale.first();
    let mut best = (first.note, (first.frequency - target).abs());

    for entry in &scale.entries()[1..] {
        let diff = (entry.frequency - target).abs();
        if diff < best.1 {
            best = (entry.note, diff);
        }
    }

    best.0
}

/// Magnitude fed to [`nearest_note`] for a temperature reading.
pub fn temperature_magnitude(temperature: f64, multiplier: u32) -> f64 {
    temperature.abs() * f64::from(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleEntry;

    fn synthetic_table() -> ScaleTable {
        let entries = [(57, 220.0), (59, 246.0), (60, 261.0), (62, 293.0), (64, 330.0)]
            .into_iter()
            .map(|(midi, frequency)| ScaleEntry {
                note: Note::from_midi(midi).unwrap(),
                frequency,
            })
            .collect();
        ScaleTable::from_entries("synthetic", entries).unwrap()
    }

    #[test]
    fn test_large_values_wrap_into_scale() {
        assert_eq!(delta_index(40, 0, 19), 2);
        assert_eq!(delta_index(38, 37, 19), 0);
        assert_eq!(delta_index(20, 500, 19), 1);
    }

    #[test]
    fn test_small_values_use_signed_delta() {
        assert_eq!(delta_index(12, 5, 19), 7);
        assert_eq!(delta_index(5, 12, 19), -7);
        // Equal to the length is not "larger than" it
        assert_eq!(delta_index(19, 3, 19), 16);
    }

    #[test]
    fn test_missed_lookup_holds_previous_note() {
        let scale = synthetic_table();
        let held = Note::from_midi(64);
        assert_eq!(lookup_or_hold(&scale, -3, held), held);
        assert_eq!(lookup_or_hold(&scale, 5, held), held);
        assert_eq!(lookup_or_hold(&scale, 9, None), None);
        assert_eq!(lookup_or_hold(&scale, 1, held), Note::from_midi(59));
    }

    #[test]
    fn test_nearest_frequency_match() {
        let scale = synthetic_table();
        assert_eq!(nearest_note(260.0, &scale).midi(), 60);
        assert_eq!(nearest_note(0.0, &scale).midi(), 57);
        assert_eq!(nearest_note(10_000.0, &scale).midi(), 64);
    }

    #[test]
    fn test_nearest_frequency_tie_keeps_first() {
        let scale = synthetic_table();
        // Exactly halfway between 220 and 246
        assert_eq!(nearest_note(233.0, &scale).midi(), 57);
    }

    #[test]
    fn test_temperature_magnitude_ignores_sign() {
        assert_eq!(temperature_magnitude(-4.5, 10), 45.0);
        assert_eq!(temperature_magnitude(4.5, 10), 45.0);
    }
}
