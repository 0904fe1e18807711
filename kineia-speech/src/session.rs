//! Listening session state for the speech screen

use crate::error::SpeechError;
use crate::recognizer::{RecognitionEvent, SpeechRecognizer};
use crate::transcript::SpokenUtterance;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenState {
    Idle,
    Listening,
}

/// Microphone permission plus the start/stop toggle the user drives
#[derive(Debug)]
pub struct ListeningSession {
    permission_granted: bool,
    state: ListenState,
    display_text: String,
}

impl Default for ListeningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ListeningSession {
    pub fn new() -> Self {
        Self {
            permission_granted: false,
            state: ListenState::Idle,
            display_text: String::new(),
        }
    }

    /// Record the outcome of the microphone permission request
    pub fn set_permission(&mut self, granted: bool) {
        if !granted {
            warn!("Microphone permission denied");
        }
        self.permission_granted = granted;
    }

    pub fn has_permission(&self) -> bool {
        self.permission_granted
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == ListenState::Listening
    }

    /// Last transcript, or the last recognizer error as `Error: <message>`
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            ListenState::Idle => "Start listening",
            ListenState::Listening => "Stop listening",
        }
    }

    /// Start listening when idle, stop when listening
    pub async fn toggle(&mut self, recognizer: &dyn SpeechRecognizer) -> Result<ListenState, SpeechError> {
        if !self.permission_granted {
            return Err(SpeechError::PermissionDenied);
        }

        match self.state {
            ListenState::Idle => {
                recognizer.start_listening().await?;
                self.state = ListenState::Listening;
                info!("Listening started on {}", recognizer.name());
            }
            ListenState::Listening => {
                recognizer.stop_listening().await?;
                self.state = ListenState::Idle;
                info!("Listening stopped on {}", recognizer.name());
            }
        }
        Ok(self.state)
    }

    /// Apply a recognizer event. Returns the utterance for a final transcript.
    pub fn on_event(&mut self, event: RecognitionEvent) -> Option<SpokenUtterance> {
        self.state = ListenState::Idle;
        match event {
            RecognitionEvent::Final(transcript) => {
                let utterance = SpokenUtterance::parse(transcript);
                debug!("Heard '{}' -> {:?}", utterance.transcript(), utterance.words());
                self.display_text = utterance.transcript().to_string();
                Some(utterance)
            }
            RecognitionEvent::Error(kind) => {
                warn!("Recognizer error: {}", kind);
                self.display_text = format!("Error: {}", kind);
                None
            }
        }
    }

    /// Forget the displayed text and go back to idle
    pub fn reset(&mut self) {
        self.state = ListenState::Idle;
        self.display_text.clear();
    }
}
