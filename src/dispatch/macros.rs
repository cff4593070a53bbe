//! Keyboard macro recording

use crate::keymap::KeyEvent;

/// Recorded raw events plus the recording and replay flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroRecorder {
    events: Vec<KeyEvent>,
    recording: bool,
    replaying: bool,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Begin a new recording, dropping the previous macro
    ///
    /// Refused while a replay is in flight.
    pub fn start(&mut self) -> bool {
        if self.replaying {
            return false;
        }
        self.events.clear();
        self.recording = true;
        true
    }

    /// End the recording, dropping the toggle event that ended it
    pub fn finish(&mut self) {
        self.events.pop();
        self.recording = false;
    }

    /// Append an event while recording
    pub fn capture(&mut self, event: &KeyEvent) {
        if self.recording {
            self.events.push(*event);
        }
    }

    pub fn has_macro(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// The events to feed back, tagged as replayed
    pub fn replay_events(&self) -> Vec<KeyEvent> {
        self.events.iter().map(KeyEvent::replayed).collect()
    }

    pub(crate) fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }
}
