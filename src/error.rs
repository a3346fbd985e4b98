use crate::midi::MidiError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing a run: settings, scales and data acquisition.
///
/// Once a sequencer is constructed nothing in the pulse path returns one of these.
#[derive(Debug, Error)]
pub enum SonifyError {
    #[error("failed to read telemetry from {}: {}", .path.display(), .source)]
    TelemetryRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("telemetry file {} contains no records", .0.display())]
    EmptyTelemetry(PathBuf),

    #[error("no telemetry samples to play")]
    NoSamples,

    #[error("weather request failed: {0}")]
    WeatherFetch(#[from] Box<ureq::Error>),

    #[error("failed to read weather sample from {}: {}", .path.display(), .source)]
    WeatherFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("weather response could not be decoded: {0}")]
    WeatherDecode(String),

    #[error("weather sample has no {0} temperatures to play")]
    EmptyMelody(&'static str),

    #[error("missing setting `{0}`")]
    MissingSetting(&'static str),

    #[error("tempo {0} is outside 1..={max} BPM", max = crate::config::MAX_TEMPO)]
    InvalidTempo(u32),

    #[error("invalid note name `{0}`")]
    InvalidNote(String),

    #[error("unknown scale `{0}`")]
    UnknownScale(String),

    #[error("scale `{name}` has no notes between {low} and {high}")]
    EmptyScale {
        name: String,
        low: String,
        high: String,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Midi(#[from] MidiError),
}

pub type Result<T> = std::result::Result<T, SonifyError>;
