//! Input data: flight telemetry tables and weather samples.
//!
//! Everything here runs once, before a sequencer exists. Failures surface as
//! [`SonifyError`](crate::error::SonifyError) so a run never starts on bad data.

mod telemetry;
mod weather;

pub use telemetry::{load_telemetry, parse_leading_int, read_telemetry, FlightSample};
pub use weather::{fetch_weather, load_weather_file, parse_weather, WeatherRequest, WeatherSample};
