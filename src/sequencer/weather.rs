use super::{push_change, Composition, Cursor, Progress, SequencerEvent};
use crate::clock::{BeatSignal, Division};
use crate::data::WeatherSample;
use crate::error::{Result, SonifyError};
use crate::quantize::{nearest_note, temperature_magnitude};
use crate::scale::{Note, ScaleTable};
use crate::voice::{random_velocity, NoteChangeTracker, Voice, PAD_VELOCITY};
use log::info;
use rand::{Rng, RngCore};
use std::str::FromStr;

pub const MULTIPLIER_MIN: u32 = 1;
pub const MULTIPLIER_MAX: u32 = 99;

/// Which temperature series becomes the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MelodySource {
    #[default]
    Hourly,
    Daily,
}

impl MelodySource {
    fn name(&self) -> &'static str {
        match self {
            MelodySource::Hourly => "hourly",
            MelodySource::Daily => "daily",
        }
    }
}

impl FromStr for MelodySource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Ok(MelodySource::Hourly),
            "daily" => Ok(MelodySource::Daily),
            other => Err(format!("unknown melody source '{}'", other)),
        }
    }
}

/// Weather: a looping melody from forecast temperatures over a pad holding the
/// current temperature.
///
/// Every time the melody runs out it is rebuilt with a fresh random multiplier,
/// so the same forecast keeps being re-tuned and the run never ends on its own.
pub struct WeatherComposition {
    current: f64,
    temperatures: Vec<f64>,
    scale: ScaleTable,
    multiplier: u32,
    melody: Vec<Note>,
    cursor: Cursor,
    lead: Note,
    melody_voice: NoteChangeTracker,
    pad_voice: NoteChangeTracker,
    regenerations: u64,
}

impl WeatherComposition {
    pub fn new<R: Rng + ?Sized>(
        sample: &WeatherSample,
        source: MelodySource,
        scale: ScaleTable,
        rng: &mut R,
    ) -> Result<Self> {
        let temperatures = match source {
            MelodySource::Hourly => sample.hourly.clone(),
            MelodySource::Daily => sample.daily.clone(),
        };
        if temperatures.is_empty() {
            return Err(SonifyError::EmptyMelody(source.name()));
        }

        let mut composition = WeatherComposition {
            current: sample.current,
            cursor: Cursor::new(temperatures.len()),
            temperatures,
            lead: scale.first().note,
            scale,
            multiplier: MULTIPLIER_MIN,
            melody: Vec::new(),
            melody_voice: NoteChangeTracker::new(Voice::Melody),
            pad_voice: NoteChangeTracker::new(Voice::Pad),
            regenerations: 0,
        };
        composition.regenerate(rng);
        // The pad keeps the lead from the first mapping for the whole run.
        composition.lead = composition.lead_for(composition.multiplier);
        Ok(composition)
    }

    /// Draws a new multiplier, remaps the melody and rewinds the cursor.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.multiplier = rng.gen_range(MULTIPLIER_MIN..=MULTIPLIER_MAX);
        let multiplier = self.multiplier;
        let scale = &self.scale;
        self.melody = self
            .temperatures
            .iter()
            .map(|&t| nearest_note(temperature_magnitude(t, multiplier), scale))
            .collect();
        self.cursor.rewind(self.melody.len());
        self.regenerations += 1;
        info!(
            "Melody mapped with multiplier {} ({} notes, pass {})",
            self.multiplier,
            self.melody.len(),
            self.regenerations
        );
    }

    fn lead_for(&self, multiplier: u32) -> Note {
        nearest_note(temperature_magnitude(self.current, multiplier), &self.scale)
    }

    pub fn lead(&self) -> Note {
        self.lead
    }

    pub fn melody(&self) -> &[Note] {
        &self.melody
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

impl Composition for WeatherComposition {
    fn division(&self) -> Division {
        Division::HalfNotePhases
    }

    fn on_start(&mut self, _rng: &mut dyn RngCore, events: &mut Vec<SequencerEvent>) {
        let change = self.pad_voice.strike(self.lead, PAD_VELOCITY);
        push_change(events, Voice::Pad, change);
    }

    fn on_beat(
        &mut self,
        signal: BeatSignal,
        rng: &mut dyn RngCore,
        events: &mut Vec<SequencerEvent>,
    ) -> Progress {
        match signal {
            BeatSignal::NoteOffPhase => {
                if let Some(note) = self.melody_voice.release() {
                    events.push(SequencerEvent::note_off(Voice::Melody, note));
                }
            }
            BeatSignal::NoteOnPhase => {
                if let Some(&note) = self.melody.get(self.cursor.index()) {
                    let change = self.melody_voice.strike(note, random_velocity(rng));
                    push_change(events, Voice::Melody, change);
                }
                if self.cursor.advance() {
                    self.regenerate(rng);
                }
            }
            BeatSignal::Beat => {}
        }
        Progress::Continue
    }

    fn on_stop(&mut self, events: &mut Vec<SequencerEvent>) {
        if let Some(note) = self.pad_voice.release() {
            events.push(SequencerEvent::note_off(Voice::Pad, note));
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.cursor.index(), self.cursor.len())
    }
}
