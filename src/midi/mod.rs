//! MIDI functionality for SoniSync
//!
//! This module provides MIDI communication capabilities, including:
//! - Core MIDI message types and error handling
//! - Clock transport messages and an internal clock for simulation
//! - Real MIDI device communication via midir
//! - Mock implementations for testing
//!
//! The main components are:
//! - [`MidiEngine`] trait for sending MIDI messages
//! - [`MidirEngine`] and [`connect_clock_input`] for real MIDI devices
//! - [`MockMidiEngine`] for testing
//! - [`InternalClock`] for driving runs without a DAW
//!
mod clock;
mod engine;
pub mod midir_engine;
pub mod mock_engine;
mod ports;

pub use engine::{MidiEngine, MidiError, MidiMessage, Result};

pub use midir_engine::{connect_clock_input, list_devices, MidirEngine, PortTarget};
pub use mock_engine::MockMidiEngine;

pub use clock::{pulse_interval, ClockMessage, InternalClock};

pub use ports::{pick_port, resolve_port};
