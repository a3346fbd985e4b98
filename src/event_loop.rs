// event_loop.rs

use crate::midi::ClockMessage;
use crate::sequencer::{Composition, Sequencer, SequencerState};
use crate::sink::EventSink;
use crossbeam::channel::{Receiver, RecvTimeoutError};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rand::Rng;
use std::time::Duration;

pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Stopped,
    Disconnected,
}

pub struct EventLoop<'a> {
    clock_rx: Receiver<ClockMessage>,
    progress: Option<&'a ProgressBar>,
}

impl<'a> EventLoop<'a> {
    pub fn new(clock_rx: Receiver<ClockMessage>) -> Self {
        EventLoop {
            clock_rx,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Feeds clock messages to `sequencer` in arrival order until it stops
    /// or the clock source goes away.
    pub fn run<C, S, R>(&self, sequencer: &mut Sequencer<C, S, R>) -> LoopExit
    where
        C: Composition,
        S: EventSink,
        R: Rng,
    {
        info!("Event loop waiting for clock messages");
        loop {
            match self.clock_rx.recv_timeout(INACTIVITY_TIMEOUT) {
                Ok(msg) => {
                    if msg != ClockMessage::Tick {
                        debug!("Transport message: {:?}", msg);
                    }
                    sequencer.handle(msg);
                    self.update_progress(sequencer.composition());

                    if sequencer.state() == SequencerState::Stopped {
                        info!("Sequencer stopped, leaving event loop");
                        return LoopExit::Stopped;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if sequencer.state() == SequencerState::Running {
                        warn!(
                            "No clock messages received for {:?} while running",
                            INACTIVITY_TIMEOUT
                        );
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Clock source disconnected");
                    return LoopExit::Disconnected;
                }
            }
        }
    }

    fn update_progress<C: Composition>(&self, composition: &C) {
        if let Some(progress) = self.progress {
            let (position, len) = composition.position();
            progress.set_length(len as u64);
            progress.set_position(position as u64);
        }
    }
}
