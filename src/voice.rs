//! Per-voice note state and the decision of when a voice re-triggers.

use crate::scale::Note;
use log::debug;
use rand::Rng;
use std::fmt;

pub const VELOCITY_MIN: u8 = 100;
pub const VELOCITY_MAX: u8 = 127;
pub const PAD_VELOCITY: u8 = 127;

/// The logical voices a run can play, each on its own MIDI channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voice {
    Speed,
    Altitude,
    Melody,
    Pad,
}

impl Voice {
    /// Zero-based MIDI channel nibble
    pub fn channel(&self) -> u8 {
        match self {
            Voice::Speed => 2,
            Voice::Altitude => 1,
            Voice::Melody => 1,
            Voice::Pad => 2,
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Voice::Speed => "speed",
            Voice::Altitude => "altitude",
            Voice::Melody => "melody",
            Voice::Pad => "pad",
        };
        f.pad(name)
    }
}

pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(VELOCITY_MIN..=VELOCITY_MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceState {
    pub previous_value: i64,
    pub previous_note: Option<Note>,
    pub has_changed_once: bool,
    /// Note turned on and not yet turned off.
    pub sounding: Option<Note>,
}

/// Outcome of one evaluation: what to release and what to strike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteChange {
    pub off: Option<Note>,
    pub on: Option<(Note, u8)>,
}

impl NoteChange {
    pub fn is_empty(&self) -> bool {
        self.off.is_none() && self.on.is_none()
    }
}

pub struct NoteChangeTracker {
    voice: Voice,
    state: VoiceState,
}

impl NoteChangeTracker {
    pub fn new(voice: Voice) -> Self {
        NoteChangeTracker {
            voice,
            state: VoiceState::default(),
        }
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    /// Decides whether `raw` (already quantized to `candidate`) re-triggers the voice.
    ///
    /// A repeat of the previous raw value is silent only until the voice has
    /// changed once; from then on every evaluation releases and re-strikes.
    /// Previous value and note are updated either way.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        raw: i64,
        candidate: Option<Note>,
        rng: &mut R,
    ) -> NoteChange {
        let change = if raw == self.state.previous_value && !self.state.has_changed_once {
            match candidate {
                Some(note) => debug!("{}: {} is not changed", self.voice, note),
                None => debug!("{}: no note yet, not changed", self.voice),
            }
            NoteChange::default()
        } else {
            self.state.has_changed_once = true;
            match candidate {
                Some(note) => self.strike(note, random_velocity(rng)),
                None => NoteChange {
                    off: self.release(),
                    on: None,
                },
            }
        };

        self.state.previous_value = raw;
        self.state.previous_note = candidate;
        change
    }

    /// Releases whatever is sounding and starts `note`.
    pub fn strike(&mut self, note: Note, velocity: u8) -> NoteChange {
        let off = self.release();
        self.state.sounding = Some(note);
        NoteChange {
            off,
            on: Some((note, velocity)),
        }
    }

    /// The sounding note, if any, which is now considered off.
    pub fn release(&mut self) -> Option<Note> {
        self.state.sounding.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn note(midi: u8) -> Option<Note> {
        Note::from_midi(midi)
    }

    #[test]
    fn test_repeat_before_first_change_is_silent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = NoteChangeTracker::new(Voice::Speed);

        let change = tracker.evaluate(0, note(57), &mut rng);
        assert!(change.is_empty());
        assert!(!tracker.state().has_changed_once);
        assert_eq!(tracker.state().previous_note, note(57));
    }

    #[test]
    fn test_first_change_strikes_without_release() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = NoteChangeTracker::new(Voice::Altitude);

        let change = tracker.evaluate(5, note(60), &mut rng);
        assert_eq!(change.off, None);
        let (on, velocity) = change.on.unwrap();
        assert_eq!(Some(on), note(60));
        assert!((VELOCITY_MIN..=VELOCITY_MAX).contains(&velocity));
        assert_eq!(tracker.state().sounding, note(60));
    }

    #[test]
    fn test_sticky_change_retriggers_on_repeat() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = NoteChangeTracker::new(Voice::Speed);

        tracker.evaluate(5, note(60), &mut rng);
        let change = tracker.evaluate(5, note(62), &mut rng);
        assert_eq!(change.off, note(60));
        assert_eq!(change.on.map(|(n, _)| n), note(62));
    }

    #[test]
    fn test_missing_candidate_only_releases() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = NoteChangeTracker::new(Voice::Speed);

        tracker.evaluate(3, note(60), &mut rng);
        let change = tracker.evaluate(4, None, &mut rng);
        assert_eq!(change.off, note(60));
        assert_eq!(change.on, None);
        assert_eq!(tracker.state().sounding, None);

        // Nothing sounding, so nothing to release either
        let change = tracker.evaluate(9, None, &mut rng);
        assert!(change.is_empty());
    }

    #[test]
    fn test_velocity_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let velocity = random_velocity(&mut rng);
            assert!((100..=127).contains(&velocity));
        }
    }
}
