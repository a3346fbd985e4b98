//! Where sequencer events go: the console for simulation runs, a MIDI port for
//! live runs, or a plain `Vec` when recording.

use crate::midi::{self, MidiEngine, MidiMessage};
use crate::sequencer::SequencerEvent;
use chrono::Local;
use std::io::{self, Write};

pub trait EventSink {
    fn emit(&mut self, event: &SequencerEvent) -> midi::Result<()>;
}

impl EventSink for Vec<SequencerEvent> {
    fn emit(&mut self, event: &SequencerEvent) -> midi::Result<()> {
        self.push(*event);
        Ok(())
    }
}

impl From<&SequencerEvent> for MidiMessage {
    fn from(event: &SequencerEvent) -> Self {
        match *event {
            SequencerEvent::NoteOn {
                channel,
                note,
                velocity,
                ..
            } => MidiMessage::NoteOn {
                channel,
                note: note.midi(),
                velocity,
            },
            SequencerEvent::NoteOff { channel, note, .. } => MidiMessage::NoteOff {
                channel,
                note: note.midi(),
                velocity: 0,
            },
            SequencerEvent::Stop => MidiMessage::Stop,
        }
    }
}

/// Sends events to a MIDI engine.
pub struct MidiSink<E> {
    engine: E,
}

impl<E: MidiEngine> MidiSink<E> {
    pub fn new(engine: E) -> Self {
        MidiSink { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: MidiEngine> EventSink for MidiSink<E> {
    fn emit(&mut self, event: &SequencerEvent) -> midi::Result<()> {
        self.engine.send(MidiMessage::from(event))
    }
}

/// Prints timestamped, human readable lines.
pub struct ConsoleSink<W> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleSink { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        ConsoleSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// One console line per event, without the timestamp.
pub fn describe(event: &SequencerEvent) -> String {
    match event {
        SequencerEvent::NoteOn {
            voice,
            channel,
            note,
            velocity,
        } => format!(
            "{:<8} {:<4} advance  ch={} note={} vel={}",
            voice,
            note.to_string(),
            channel,
            note.midi(),
            velocity
        ),
        SequencerEvent::NoteOff {
            voice,
            channel,
            note,
        } => format!(
            "{:<8} {:<4} retard   ch={} note={}",
            voice,
            note.to_string(),
            channel,
            note.midi()
        ),
        SequencerEvent::Stop => "--- stop ---".to_string(),
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn emit(&mut self, event: &SequencerEvent) -> midi::Result<()> {
        writeln!(
            self.out,
            "[{}] {}",
            Local::now().format("%H:%M:%S%.3f"),
            describe(event)
        )
        .map_err(|e| midi::MidiError::SendError(e.to_string()))
    }
}
