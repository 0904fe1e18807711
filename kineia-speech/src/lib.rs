//! kineia-speech: from recognized speech to gesture words
//!
//! Provides:
//! - Transcript tokenization and word normalization
//! - The speech recognizer contract and an in-process channel recognizer
//! - Listening session state (permission, start/stop toggle, display text)

pub mod error;
pub mod transcript;
pub mod recognizer;
pub mod session;

pub use error::SpeechError;
pub use transcript::{normalize_word, SpokenUtterance};
pub use recognizer::{ChannelRecognizer, RecognitionEvent, RecognizerErrorKind, SpeechRecognizer, TranscriptFeeder};
pub use session::{ListenState, ListeningSession};
