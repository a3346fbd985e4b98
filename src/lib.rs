pub mod cli;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod event_loop;
pub mod logging;
pub mod midi;
pub mod quantize;
pub mod scale;
pub mod sequencer;
pub mod sink;
pub mod ui;
pub mod voice;

pub use cli::{Args, Command};
pub use clock::{BeatSignal, ClockDivider, ClockState, Division};
pub use error::{Result, SonifyError};
pub use scale::{Note, ScaleEntry, ScaleTable};
pub use sequencer::{
    Composition, Cursor, MelodySource, Progress, Sequencer, SequencerEvent, SequencerState,
    TelemetryComposition, WeatherComposition,
};
pub use sink::{ConsoleSink, EventSink, MidiSink};
pub use voice::{NoteChange, NoteChangeTracker, Voice, VoiceState};
