use crate::midi::{ClockMessage, MidiEngine, MidiError, MidiMessage, Result};
use crossbeam::channel::Sender;
use log::{debug, info, trace};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

/// Where to attach a port: an existing device matched by name, or a virtual
/// port other applications can connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortTarget {
    Named(String),
    Virtual(String),
}

/// Outbound connection used by the live sink.
pub struct MidirEngine {
    output: MidiOutputConnection,
}

impl MidirEngine {
    pub fn connect(client_name: &str, target: &PortTarget) -> Result<Self> {
        let midi_out = MidiOutput::new(&format!("{}-out", client_name))
            .map_err(|e| MidiError::ConnectionError(e.to_string()))?;

        let output = match target {
            PortTarget::Named(name) => {
                let out_ports = midi_out.ports();
                let out_port = out_ports
                    .iter()
                    .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
                    .ok_or_else(|| {
                        MidiError::ConnectionError(format!("Output device '{}' not found", name))
                    })?;
                info!("Connecting to MIDI output port: {}", name);
                midi_out
                    .connect(out_port, &format!("{}-output", client_name))
                    .map_err(|e| MidiError::ConnectionError(e.to_string()))?
            }
            PortTarget::Virtual(name) => create_virtual_output(midi_out, name)?,
        };

        Ok(MidirEngine { output })
    }
}

impl MidiEngine for MidirEngine {
    fn send(&mut self, msg: MidiMessage) -> Result<()> {
        let bytes = msg.to_bytes();
        trace!("Sending MIDI bytes: {:02X?}", bytes);
        self.output
            .send(&bytes)
            .map_err(|e| MidiError::SendError(e.to_string()))
    }
}

/// Opens the inbound port and forwards transport messages to `tx`.
///
/// The connection must be kept alive for as long as messages should flow.
pub fn connect_clock_input(
    client_name: &str,
    target: &PortTarget,
    tx: Sender<ClockMessage>,
) -> Result<MidiInputConnection<()>> {
    let mut midi_in = MidiInput::new(&format!("{}-in", client_name))
        .map_err(|e| MidiError::ConnectionError(e.to_string()))?;
    midi_in.ignore(Ignore::None);

    let callback = move |_stamp: u64, message: &[u8], _: &mut ()| {
        if let Some(clock_msg) = MidiMessage::parse(message)
            .as_ref()
            .and_then(ClockMessage::from_midi)
        {
            // A closed channel means the event loop has already finished.
            let _ = tx.send(clock_msg);
        }
    };

    match target {
        PortTarget::Named(name) => {
            let in_ports = midi_in.ports();
            debug!("Available MIDI input ports:");
            for port in &in_ports {
                if let Ok(port_name) = midi_in.port_name(port) {
                    debug!("  - {}", port_name);
                }
            }

            let in_port = in_ports
                .iter()
                .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
                .ok_or_else(|| {
                    MidiError::ConnectionError(format!("Input device '{}' not found", name))
                })?;

            info!("Found matching MIDI input device '{}', connecting", name);
            midi_in
                .connect(in_port, &format!("{}-input", client_name), callback, ())
                .map_err(|e| MidiError::RecvError(e.to_string()))
        }
        PortTarget::Virtual(name) => create_virtual_input(midi_in, name, callback),
    }
}

#[cfg(unix)]
fn create_virtual_input<F>(
    midi_in: MidiInput,
    name: &str,
    callback: F,
) -> Result<MidiInputConnection<()>>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    use midir::os::unix::VirtualInput;

    info!("Creating virtual MIDI input port: {}", name);
    midi_in
        .create_virtual(name, callback, ())
        .map_err(|e| MidiError::RecvError(e.to_string()))
}

#[cfg(not(unix))]
fn create_virtual_input<F>(
    _midi_in: MidiInput,
    name: &str,
    _callback: F,
) -> Result<MidiInputConnection<()>>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    Err(MidiError::ConnectionError(format!(
        "virtual port '{}' is not supported on this platform, pass --input-port",
        name
    )))
}

#[cfg(unix)]
fn create_virtual_output(midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection> {
    use midir::os::unix::VirtualOutput;

    info!("Creating virtual MIDI output port: {}", name);
    midi_out
        .create_virtual(name)
        .map_err(|e| MidiError::ConnectionError(e.to_string()))
}

#[cfg(not(unix))]
fn create_virtual_output(_midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection> {
    Err(MidiError::ConnectionError(format!(
        "virtual port '{}' is not supported on this platform, pass --output-port",
        name
    )))
}

/// Names of the input and output ports currently visible to the system.
#[cfg(not(feature = "test-mock"))]
pub fn list_devices() -> (Vec<String>, Vec<String>) {
    let mut inputs = Vec::new();
    if let Ok(midi_in) = MidiInput::new("sonisyncrs-list") {
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                inputs.push(name);
            }
        }
    }

    let mut outputs = Vec::new();
    if let Ok(midi_out) = MidiOutput::new("sonisyncrs-list") {
        for port in midi_out.ports() {
            if let Ok(name) = midi_out.port_name(&port) {
                outputs.push(name);
            }
        }
    }

    (inputs, outputs)
}

#[cfg(feature = "test-mock")]
pub fn list_devices() -> (Vec<String>, Vec<String>) {
    (
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()],
        vec!["Mock Device 1".to_string()],
    )
}
