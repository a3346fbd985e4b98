//! Clock transport messages and the internal clock used for simulation runs.

use super::MidiMessage;
use crate::config::PULSES_PER_QUARTER_NOTE;
use crossbeam::channel::Sender;
use log::{info, trace};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Represents different types of MIDI clock messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClockMessage {
    Tick,
    Start,
    Stop,
    Continue,
}

impl ClockMessage {
    /// Picks the transport messages out of the inbound stream.
    pub fn from_midi(msg: &MidiMessage) -> Option<ClockMessage> {
        match msg {
            MidiMessage::Clock => Some(ClockMessage::Tick),
            MidiMessage::Start => Some(ClockMessage::Start),
            MidiMessage::Stop => Some(ClockMessage::Stop),
            MidiMessage::Continue => Some(ClockMessage::Continue),
            _ => None,
        }
    }
}

/// Microseconds between two pulses at the given tempo.
pub fn pulse_interval(bpm: u32) -> Duration {
    let beat_duration_us = 60_000_000 / u64::from(bpm.max(1));
    Duration::from_micros(beat_duration_us / u64::from(PULSES_PER_QUARTER_NOTE))
}

/// Generates Start followed by a steady pulse stream, standing in for a DAW.
pub struct InternalClock {
    bpm: u32,
    wait: bool,
}

impl InternalClock {
    pub fn new(bpm: u32) -> Self {
        info!("Creating new InternalClock with BPM: {}", bpm);
        InternalClock { bpm, wait: true }
    }

    /// Emit pulses back to back instead of at tempo.
    pub fn instant(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Runs until the receiving side hangs up.
    pub fn start(self, tx: Sender<ClockMessage>) -> JoinHandle<()> {
        let tick_interval = pulse_interval(self.bpm);
        let wait = self.wait;
        trace!("Calculated tick interval: {:?}", tick_interval);

        thread::spawn(move || {
            info!("Internal clock thread started");
            if tx.send(ClockMessage::Start).is_err() {
                return;
            }

            let mut tick_count: u64 = 0;
            loop {
                let tick_start = Instant::now();
                if tx.send(ClockMessage::Tick).is_err() {
                    break;
                }
                tick_count += 1;

                if wait {
                    // Subtract the time spent sending to keep the grid steady
                    let elapsed = tick_start.elapsed();
                    if elapsed < tick_interval {
                        thread::sleep(tick_interval - elapsed);
                    }
                }
            }
            info!("Internal clock thread stopped after {} ticks", tick_count);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    #[test]
    fn test_pulse_interval_at_120_bpm() {
        // (60 seconds / 120 BPM) / 24 ticks per beat
        assert_eq!(pulse_interval(120), Duration::from_micros(20_833));
    }

    #[test]
    fn test_only_transport_messages_convert() {
        assert_eq!(
            ClockMessage::from_midi(&MidiMessage::Clock),
            Some(ClockMessage::Tick)
        );
        assert_eq!(
            ClockMessage::from_midi(&MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            }),
            None
        );
    }

    #[test]
    fn test_instant_clock_starts_then_ticks() {
        let (tx, rx) = unbounded();
        let handle = InternalClock::new(64).instant().start(tx);

        assert_eq!(rx.recv().unwrap(), ClockMessage::Start);
        for _ in 0..48 {
            assert_eq!(rx.recv().unwrap(), ClockMessage::Tick);
        }

        drop(rx);
        handle.join().unwrap();
    }
}
