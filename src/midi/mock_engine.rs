use crate::midi::{MidiEngine, MidiError, MidiMessage, Result};

/// Records everything it is asked to send.
#[derive(Debug, Default)]
pub struct MockMidiEngine {
    pub sent: Vec<MidiMessage>,
    fail_sends: bool,
}

impl MockMidiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose every send fails, for exercising error paths.
    pub fn failing() -> Self {
        MockMidiEngine {
            sent: Vec::new(),
            fail_sends: true,
        }
    }
}

impl MidiEngine for MockMidiEngine {
    fn send(&mut self, msg: MidiMessage) -> Result<()> {
        if self.fail_sends {
            return Err(MidiError::SendError("mock port closed".to_string()));
        }
        self.sent.push(msg);
        Ok(())
    }
}
