use super::{push_change, Composition, Cursor, Progress, SequencerEvent};
use crate::clock::{BeatSignal, Division};
use crate::data::FlightSample;
use crate::error::{Result, SonifyError};
use crate::quantize::{delta_index, lookup_or_hold};
use crate::scale::ScaleTable;
use crate::voice::{NoteChangeTracker, Voice};
use log::trace;
use rand::RngCore;

/// Flight telemetry: speed and altitude each drive a voice, one sample per beat.
pub struct TelemetryComposition {
    samples: Vec<FlightSample>,
    scale: ScaleTable,
    cursor: Cursor,
    speed: NoteChangeTracker,
    altitude: NoteChangeTracker,
}

impl TelemetryComposition {
    pub fn new(samples: Vec<FlightSample>, scale: ScaleTable) -> Result<Self> {
        if samples.is_empty() {
            return Err(SonifyError::NoSamples);
        }

        Ok(TelemetryComposition {
            cursor: Cursor::new(samples.len()),
            samples,
            scale,
            speed: NoteChangeTracker::new(Voice::Speed),
            altitude: NoteChangeTracker::new(Voice::Altitude),
        })
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn tracker(&self, voice: Voice) -> Option<&NoteChangeTracker> {
        match voice {
            Voice::Speed => Some(&self.speed),
            Voice::Altitude => Some(&self.altitude),
            _ => None,
        }
    }
}

fn play_voice(
    tracker: &mut NoteChangeTracker,
    scale: &ScaleTable,
    raw: i64,
    rng: &mut dyn RngCore,
    events: &mut Vec<SequencerEvent>,
) {
    let state = tracker.state();
    let index = delta_index(raw, state.previous_value, scale.len());
    let candidate = lookup_or_hold(scale, index, state.previous_note);
    trace!("{}: raw {} -> index {} -> {:?}", tracker.voice(), raw, index, candidate);

    let change = tracker.evaluate(raw, candidate, rng);
    push_change(events, tracker.voice(), change);
}

impl Composition for TelemetryComposition {
    fn division(&self) -> Division {
        Division::Quarter
    }

    fn on_beat(
        &mut self,
        signal: BeatSignal,
        rng: &mut dyn RngCore,
        events: &mut Vec<SequencerEvent>,
    ) -> Progress {
        if signal != BeatSignal::Beat {
            return Progress::Continue;
        }

        let Some(sample) = self.samples.get(self.cursor.index()).copied() else {
            return Progress::Finished;
        };

        play_voice(
            &mut self.speed,
            &self.scale,
            i64::from(sample.speed),
            rng,
            events,
        );
        play_voice(
            &mut self.altitude,
            &self.scale,
            i64::from(sample.altitude),
            rng,
            events,
        );

        if self.cursor.advance() {
            Progress::Finished
        } else {
            Progress::Continue
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.cursor.index(), self.cursor.len())
    }
}
