use crate::config::Settings;
use crate::sequencer::MelodySource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (TOML); defaults to sonisyncrs.toml when present
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Print events to the console, driven by an internal clock
    #[arg(long, global = true)]
    pub simulate: bool,

    /// With --simulate, run the internal clock without waiting between pulses
    #[arg(long, global = true, requires = "simulate")]
    pub instant: bool,

    /// Seed for velocities and melody multipliers
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Tempo in BPM
    #[arg(long, global = true)]
    pub tempo: Option<u32>,

    /// Scale name, e.g. "A minor blues"
    #[arg(long, global = true)]
    pub scale: Option<String>,

    /// Lowest note of the range, e.g. A3
    #[arg(long, global = true)]
    pub low: Option<String>,

    /// Highest note of the range, e.g. A6
    #[arg(long, global = true)]
    pub high: Option<String>,

    /// Bind the clock input to an existing MIDI device instead of a virtual port
    #[arg(long, global = true)]
    pub input_port: Option<String>,

    /// Send notes to an existing MIDI device instead of a virtual port
    #[arg(long, global = true)]
    pub output_port: Option<String>,

    /// Choose MIDI ports interactively
    #[arg(long, global = true)]
    pub pick_ports: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sonify flight telemetry (speed and altitude)
    Flight {
        /// Semicolon-delimited telemetry with `metres` and `mph` columns
        #[arg(long)]
        data: PathBuf,
    },
    /// Sonify the weather forecast for LATITUDE/LONGITUDE
    Weather {
        /// Read a One Call JSON response from disk instead of fetching it
        #[arg(long)]
        weather_file: Option<PathBuf>,

        /// Temperature series that becomes the melody
        #[arg(long, default_value = "hourly")]
        melody: MelodySource,
    },
}

impl Args {
    /// Applies command line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        let section = match self.command {
            Some(Command::Weather { .. }) => &mut settings.weather,
            _ => &mut settings.flight,
        };

        if let Some(tempo) = self.tempo {
            section.tempo = tempo;
        }
        if let Some(scale) = &self.scale {
            section.scale = scale.clone();
        }
        if let Some(low) = &self.low {
            section.low = low.clone();
        }
        if let Some(high) = &self.high {
            section.high = high.clone();
        }
        if self.input_port.is_some() {
            settings.midi.input_port = self.input_port.clone();
        }
        if self.output_port.is_some() {
            settings.midi.output_port = self.output_port.clone();
        }
    }
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}
