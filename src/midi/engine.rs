use std::error::Error;
use std::fmt;

/// Custom error type for MIDI operations
#[derive(Debug)]
pub enum MidiError {
    /// Error when sending a MIDI message
    SendError(String),
    /// Error when the inbound port cannot be opened or read
    RecvError(String),
    /// Error when connecting to a MIDI device
    ConnectionError(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::SendError(msg) => write!(f, "MIDI send error: {}", msg),
            MidiError::RecvError(msg) => write!(f, "MIDI receive error: {}", msg),
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
        }
    }
}

impl Error for MidiError {}

/// Represents a MIDI message that can be sent or received
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// MIDI Clock timing message
    Clock,
    /// MIDI Start message
    Start,
    /// MIDI Stop message
    Stop,
    /// MIDI Continue message
    Continue,
}

impl MidiMessage {
    /// Decodes a raw message. Anything this crate does not care about yields `None`.
    pub fn parse(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;

        match status {
            0xF8 => return Some(MidiMessage::Clock),
            0xFA => return Some(MidiMessage::Start),
            0xFC => return Some(MidiMessage::Stop),
            0xFB => return Some(MidiMessage::Continue),
            _ => {}
        }

        match status & 0xF0 {
            // A note-on with velocity 0 is a note-off by convention.
            0x90 if data.len() >= 3 && data[2] == 0 => Some(MidiMessage::NoteOff {
                channel: status & 0x0F,
                note: data[1],
                velocity: 0,
            }),
            0x90 if data.len() >= 3 => Some(MidiMessage::NoteOn {
                channel: status & 0x0F,
                note: data[1],
                velocity: data[2],
            }),
            0x80 if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel: status & 0x0F,
                note: data[1],
                velocity: data[2],
            }),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::Clock => vec![0xF8],
            MidiMessage::Start => vec![0xFA],
            MidiMessage::Stop => vec![0xFC],
            MidiMessage::Continue => vec![0xFB],
        }
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Trait defining the outbound side of a MIDI implementation
pub trait MidiEngine: Send {
    /// Sends a MIDI message to the device
    fn send(&mut self, msg: MidiMessage) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_messages_parse() {
        assert_eq!(MidiMessage::parse(&[0xF8]), Some(MidiMessage::Clock));
        assert_eq!(MidiMessage::parse(&[0xFA]), Some(MidiMessage::Start));
        assert_eq!(MidiMessage::parse(&[0xFC]), Some(MidiMessage::Stop));
        assert_eq!(MidiMessage::parse(&[0xFB]), Some(MidiMessage::Continue));
    }

    #[test]
    fn test_note_on_with_zero_velocity_is_note_off() {
        assert_eq!(
            MidiMessage::parse(&[0x91, 60, 0]),
            Some(MidiMessage::NoteOff {
                channel: 1,
                note: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn test_unknown_and_truncated_messages_are_ignored() {
        assert_eq!(MidiMessage::parse(&[]), None);
        assert_eq!(MidiMessage::parse(&[0x90, 60]), None);
        assert_eq!(MidiMessage::parse(&[0xB0, 7, 100]), None);
    }

    #[test]
    fn test_note_messages_encode_channel_nibble() {
        let on = MidiMessage::NoteOn {
            channel: 2,
            note: 69,
            velocity: 110,
        };
        assert_eq!(on.to_bytes(), vec![0x92, 69, 110]);

        let off = MidiMessage::NoteOff {
            channel: 1,
            note: 57,
            velocity: 0,
        };
        assert_eq!(off.to_bytes(), vec![0x81, 57, 0]);
        assert_eq!(MidiMessage::Stop.to_bytes(), vec![0xFC]);
    }

    #[test]
    fn test_error_messages_name_the_direction() {
        let recv = MidiError::RecvError("port busy".to_string());
        assert_eq!(recv.to_string(), "MIDI receive error: port busy");
        let send = MidiError::SendError("closed".to_string());
        assert_eq!(send.to_string(), "MIDI send error: closed");
    }
}
