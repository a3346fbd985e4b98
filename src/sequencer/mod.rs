//! The clock-driven sequencer.
//!
//! A [`Sequencer`] owns the clock divider, the voice state (inside its
//! [`Composition`]) and an output sink. Everything happens synchronously inside
//! [`Sequencer::on_pulse`], [`Sequencer::on_start`] and [`Sequencer::on_stop`],
//! so a run can be replayed deterministically by feeding synthetic pulses.

mod cursor;
pub mod telemetry;
pub mod weather;

pub use cursor::Cursor;
pub use telemetry::TelemetryComposition;
pub use weather::{MelodySource, WeatherComposition};

use crate::clock::{BeatSignal, ClockDivider, Division};
use crate::midi::ClockMessage;
use crate::scale::Note;
use crate::sink::EventSink;
use crate::voice::{NoteChange, Voice};
use log::{debug, error, info};
use rand::Rng;

/// What the sequencer asks its sink to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    NoteOn {
        voice: Voice,
        channel: u8,
        note: Note,
        velocity: u8,
    },
    NoteOff {
        voice: Voice,
        channel: u8,
        note: Note,
    },
    /// Terminal event once the data series is exhausted.
    Stop,
}

impl SequencerEvent {
    pub fn note_on(voice: Voice, note: Note, velocity: u8) -> Self {
        SequencerEvent::NoteOn {
            voice,
            channel: voice.channel(),
            note,
            velocity,
        }
    }

    pub fn note_off(voice: Voice, note: Note) -> Self {
        SequencerEvent::NoteOff {
            voice,
            channel: voice.channel(),
            note,
        }
    }
}

/// Appends the off/on pair described by `change`, off first.
pub fn push_change(events: &mut Vec<SequencerEvent>, voice: Voice, change: NoteChange) {
    if let Some(note) = change.off {
        events.push(SequencerEvent::note_off(voice, note));
    }
    if let Some((note, velocity)) = change.on {
        events.push(SequencerEvent::note_on(voice, note, velocity));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Finished,
}

/// The musical behaviour plugged into a [`Sequencer`].
pub trait Composition {
    fn division(&self) -> Division;

    fn on_start(&mut self, _rng: &mut dyn rand::RngCore, _events: &mut Vec<SequencerEvent>) {}

    fn on_beat(
        &mut self,
        signal: BeatSignal,
        rng: &mut dyn rand::RngCore,
        events: &mut Vec<SequencerEvent>,
    ) -> Progress;

    fn on_stop(&mut self, _events: &mut Vec<SequencerEvent>) {}

    /// Cursor position and length of the data currently being played.
    fn position(&self) -> (usize, usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
    Stopped,
}

pub struct Sequencer<C, S, R> {
    composition: C,
    sink: S,
    rng: R,
    clock: ClockDivider,
    state: SequencerState,
    events: Vec<SequencerEvent>,
}

impl<C, S, R> Sequencer<C, S, R>
where
    C: Composition,
    S: EventSink,
    R: Rng,
{
    pub fn new(composition: C, sink: S, rng: R, tempo_bpm: u32) -> Self {
        let clock = ClockDivider::new(tempo_bpm, composition.division());
        info!(
            "Sequencer ready at {} BPM ({} clocks per minute)",
            tempo_bpm,
            clock.state().total_clock_per_minute
        );
        Sequencer {
            composition,
            sink,
            rng,
            clock,
            state: SequencerState::Idle,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn composition(&self) -> &C {
        &self.composition
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &ClockDivider {
        &self.clock
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Routes a transport message to the matching handler.
    pub fn handle(&mut self, msg: ClockMessage) {
        match msg {
            ClockMessage::Tick => self.on_pulse(),
            ClockMessage::Start => self.on_start(),
            ClockMessage::Continue => {
                if self.state == SequencerState::Idle {
                    self.on_start();
                } else {
                    debug!("Ignoring Continue in state {:?}", self.state);
                }
            }
            ClockMessage::Stop => self.on_stop(),
        }
    }

    pub fn on_start(&mut self) {
        if self.state != SequencerState::Idle {
            info!("Ignoring start while {:?}", self.state);
            return;
        }

        self.state = SequencerState::Running;
        self.clock.reset();
        info!("Sequencer started");

        self.composition.on_start(&mut self.rng, &mut self.events);
        self.flush();
    }

    pub fn on_pulse(&mut self) {
        if self.state != SequencerState::Running {
            return;
        }

        let Some(signal) = self.clock.on_pulse() else {
            return;
        };

        let progress = self
            .composition
            .on_beat(signal, &mut self.rng, &mut self.events);

        if progress == Progress::Finished {
            self.events.push(SequencerEvent::Stop);
            self.state = SequencerState::Stopped;
            info!("Data exhausted, sequencer stopped");
        }
        self.flush();
    }

    /// External stop. Already sounding notes are left to the caller.
    pub fn on_stop(&mut self) {
        match self.state {
            SequencerState::Running => {
                self.composition.on_stop(&mut self.events);
                self.flush();
                info!("Sequencer stopped by transport");
            }
            SequencerState::Idle => info!("Stop received before start"),
            SequencerState::Stopped => return,
        }
        self.state = SequencerState::Stopped;
    }

    fn flush(&mut self) {
        for event in self.events.drain(..) {
            if let Err(e) = self.sink.emit(&event) {
                error!("Failed to emit {:?}: {}", event, e);
            }
        }
    }
}
