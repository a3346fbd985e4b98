// config.rs

use crate::data::WeatherRequest;
use crate::error::{Result, SonifyError};
use config::{Config, Environment, File};
use log::{debug, info};
use serde::Deserialize;
use std::env;

/// MIDI clock resolution, fixed by the MIDI standard.
pub const PULSES_PER_QUARTER_NOTE: u32 = 24;

/// Highest accepted tempo in BPM.
pub const MAX_TEMPO: u32 = 999;

pub const DEFAULT_CONFIG_FILE: &str = "sonisyncrs.toml";
pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Tempo and scale for one kind of run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SequencerSettings {
    pub tempo: u32,
    pub scale: String,
    pub low: String,
    pub high: String,
}

impl SequencerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.tempo == 0 || self.tempo > MAX_TEMPO {
            return Err(SonifyError::InvalidTempo(self.tempo));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WeatherApiSettings {
    pub url: String,
    pub api_key: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl WeatherApiSettings {
    /// Fails with the name of the first missing credential.
    pub fn request(&self) -> Result<WeatherRequest> {
        Ok(WeatherRequest {
            url: self.url.clone(),
            api_key: self
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or(SonifyError::MissingSetting("API_KEY"))?,
            latitude: self.latitude.ok_or(SonifyError::MissingSetting("LATITUDE"))?,
            longitude: self
                .longitude
                .ok_or(SonifyError::MissingSetting("LONGITUDE"))?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MidiSettings {
    pub client_name: String,
    pub input_port: Option<String>,
    pub output_port: Option<String>,
}

impl MidiSettings {
    pub fn virtual_input_name(&self) -> String {
        format!("{} input", self.client_name)
    }

    pub fn virtual_output_name(&self) -> String {
        format!("{} output", self.client_name)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub flight: SequencerSettings,
    pub weather: SequencerSettings,
    pub api: WeatherApiSettings,
    pub midi: MidiSettings,
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("flight.tempo", 64)?
        .set_default("flight.scale", "A minor blues")?
        .set_default("flight.low", "A3")?
        .set_default("flight.high", "A6")?
        .set_default("weather.tempo", 40)?
        .set_default("weather.scale", "C pentatonic")?
        .set_default("weather.low", "C3")?
        .set_default("weather.high", "C6")?
        .set_default("api.url", WEATHER_URL)?
        .set_default("midi.client_name", "sonisyncrs")?)
}

impl Settings {
    /// Defaults, then the optional file, then `SONISYNC__SECTION__KEY` variables,
    /// then the weather credentials `API_KEY`, `LATITUDE` and `LONGITUDE`.
    pub fn load(path: Option<&str>) -> Result<Settings> {
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);
        debug!("Loading settings, config file: {}", file);

        let settings: Settings = builder_with_defaults()?
            .add_source(File::with_name(file).required(path.is_some()))
            .add_source(
                Environment::with_prefix("SONISYNC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.api_key", env::var("API_KEY").ok())?
            .set_override_option("api.latitude", env::var("LATITUDE").ok())?
            .set_override_option("api.longitude", env::var("LONGITUDE").ok())?
            .build()?
            .try_deserialize()?;

        settings.flight.validate()?;
        settings.weather.validate()?;
        info!(
            "Settings loaded: flight {} BPM, weather {} BPM",
            settings.flight.tempo, settings.weather.tempo
        );
        Ok(settings)
    }

    /// Built-in defaults only; no file or environment.
    pub fn defaults() -> Result<Settings> {
        Ok(builder_with_defaults()?.build()?.try_deserialize()?)
    }
}
