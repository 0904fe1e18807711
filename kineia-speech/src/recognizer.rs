//! Speech recognizer contract and an in-process channel recognizer

use crate::error::SpeechError;
use async_trait::async_trait;
use kineia_core::SpeechConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Why the platform recognizer gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognizerErrorKind {
    NetworkTimeout,
    Network,
    Audio,
    Server,
    Client,
    SpeechTimeout,
    NoMatch,
    Busy,
    InsufficientPermissions,
    Other(i32),
}

impl RecognizerErrorKind {
    /// Map platform recognizer error codes
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NetworkTimeout,
            2 => Self::Network,
            3 => Self::Audio,
            4 => Self::Server,
            5 => Self::Client,
            6 => Self::SpeechTimeout,
            7 => Self::NoMatch,
            8 => Self::Busy,
            9 => Self::InsufficientPermissions,
            other => Self::Other(other),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NetworkTimeout => "network timeout".to_string(),
            Self::Network => "network error".to_string(),
            Self::Audio => "audio recording error".to_string(),
            Self::Server => "server error".to_string(),
            Self::Client => "client error".to_string(),
            Self::SpeechTimeout => "no speech input".to_string(),
            Self::NoMatch => "no match found".to_string(),
            Self::Busy => "recognizer busy".to_string(),
            Self::InsufficientPermissions => "insufficient permissions".to_string(),
            Self::Other(code) => format!("unknown error ({})", code),
        }
    }
}

impl fmt::Display for RecognizerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// What a recognizer reports back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionEvent {
    /// Final transcript of one listening turn
    Final(String),
    Error(RecognizerErrorKind),
}

/// External speech-to-text engine.
///
/// One `start_listening` yields at most one event; the recognizer stops
/// listening on its own after it.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn name(&self) -> &str;

    fn is_listening(&self) -> bool;

    async fn start_listening(&self) -> Result<(), SpeechError>;

    async fn stop_listening(&self) -> Result<(), SpeechError>;

    /// Release the engine; the recognizer cannot be restarted afterwards
    async fn destroy(&self);

    /// Event stream; handed out once
    fn take_events(&self) -> Option<mpsc::Receiver<RecognitionEvent>>;
}

#[derive(Debug, Default)]
struct RecognizerState {
    listening: bool,
    destroyed: bool,
}

struct Shared {
    state: Mutex<RecognizerState>,
    events: mpsc::Sender<RecognitionEvent>,
}

impl Shared {
    /// Deliver the result of the current turn, ending it
    fn finish_turn(&self, event: RecognitionEvent) -> bool {
        {
            let mut state = self.state.lock();
            if !state.listening || state.destroyed {
                debug!("Dropping recognition event outside a listening turn: {:?}", event);
                return false;
            }
            state.listening = false;
        }

        if let Err(e) = self.events.try_send(event) {
            warn!("Recognition event channel unavailable, dropping event: {}", e);
            return false;
        }
        true
    }
}

/// Recognizer whose transcripts come from a [`TranscriptFeeder`].
///
/// Used where the actual engine lives elsewhere (a line-based console, a
/// platform bridge, tests).
pub struct ChannelRecognizer {
    language: String,
    shared: Arc<Shared>,
    receiver: Mutex<Option<mpsc::Receiver<RecognitionEvent>>>,
}

/// Feeds transcripts and errors into a [`ChannelRecognizer`]
#[derive(Clone)]
pub struct TranscriptFeeder {
    shared: Arc<Shared>,
}

impl ChannelRecognizer {
    const EVENT_BUFFER_SIZE: usize = 64;

    pub fn new(config: &SpeechConfig) -> Result<(Self, TranscriptFeeder), SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let (events, receiver) = mpsc::channel(Self::EVENT_BUFFER_SIZE);
        let shared = Arc::new(Shared {
            state: Mutex::new(RecognizerState::default()),
            events,
        });

        let recognizer = Self {
            language: config.language.clone(),
            shared: Arc::clone(&shared),
            receiver: Mutex::new(Some(receiver)),
        };
        Ok((recognizer, TranscriptFeeder { shared }))
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl SpeechRecognizer for ChannelRecognizer {
    fn name(&self) -> &str {
        "channel"
    }

    fn is_listening(&self) -> bool {
        self.shared.state.lock().listening
    }

    async fn start_listening(&self) -> Result<(), SpeechError> {
        let mut state = self.shared.state.lock();
        if state.destroyed {
            return Err(SpeechError::Destroyed);
        }
        if state.listening {
            return Err(SpeechError::AlreadyListening);
        }
        state.listening = true;
        info!("Listening ({})", self.language);
        Ok(())
    }

    async fn stop_listening(&self) -> Result<(), SpeechError> {
        let mut state = self.shared.state.lock();
        if state.destroyed {
            return Err(SpeechError::Destroyed);
        }
        state.listening = false;
        debug!("Stopped listening");
        Ok(())
    }

    async fn destroy(&self) {
        let mut state = self.shared.state.lock();
        state.listening = false;
        state.destroyed = true;
        info!("Recognizer destroyed");
    }

    fn take_events(&self) -> Option<mpsc::Receiver<RecognitionEvent>> {
        self.receiver.lock().take()
    }
}

impl TranscriptFeeder {
    /// Deliver a final transcript. Returns false when nobody is listening.
    pub fn say(&self, transcript: impl Into<String>) -> bool {
        self.shared.finish_turn(RecognitionEvent::Final(transcript.into()))
    }

    /// Deliver a recognizer error. Returns false when nobody is listening.
    pub fn fail(&self, kind: RecognizerErrorKind) -> bool {
        self.shared.finish_turn(RecognitionEvent::Error(kind))
    }

    pub fn is_listening(&self) -> bool {
        self.shared.state.lock().listening
    }
}
