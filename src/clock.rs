// clock.rs

use crate::config::PULSES_PER_QUARTER_NOTE;
use log::trace;

/// How a composition wants the pulse stream divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    /// One signal per quarter note.
    Quarter,
    /// Note-off on the last pulse of every half note, note-on on the first.
    HalfNotePhases,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatSignal {
    Beat,
    NoteOffPhase,
    NoteOnPhase,
}

/// Position of the current pulse within one minute of clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    /// In `[1, total_clock_per_minute]`.
    pub counter: u32,
    pub total_clock_per_minute: u32,
}

pub struct ClockDivider {
    state: ClockState,
    division: Division,
}

impl ClockDivider {
    pub fn new(tempo_bpm: u32, division: Division) -> Self {
        ClockDivider {
            state: ClockState {
                counter: 1,
                total_clock_per_minute: PULSES_PER_QUARTER_NOTE.saturating_mul(tempo_bpm.max(1)),
            },
            division,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Back to the first pulse of the minute.
    pub fn reset(&mut self) {
        self.state.counter = 1;
    }

    /// Consumes one pulse and reports whether it lands on a boundary.
    ///
    /// The counter names the pulse being processed and wraps to 1 after the
    /// last pulse of the minute, so a beat falls on every 24th pulse even across
    /// the wrap.
    pub fn on_pulse(&mut self) -> Option<BeatSignal> {
        let position = self.state.counter;
        self.state.counter = if position >= self.state.total_clock_per_minute {
            1
        } else {
            position + 1
        };

        let signal = match self.division {
            Division::Quarter => {
                (position % PULSES_PER_QUARTER_NOTE == 0).then_some(BeatSignal::Beat)
            }
            Division::HalfNotePhases => match position % (PULSES_PER_QUARTER_NOTE * 2) {
                0 => Some(BeatSignal::NoteOffPhase),
                1 => Some(BeatSignal::NoteOnPhase),
                _ => None,
            },
        };

        if let Some(signal) = signal {
            trace!("Pulse {} -> {:?}", position, signal);
        }
        signal
    }
}
