//! Error types for kineia-speech

use crate::recognizer::RecognizerErrorKind;
use kineia_core::Error as CoreError;
use thiserror::Error;

/// Speech recognition errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Microphone permission not granted")]
    PermissionDenied,

    #[error("Recognizer error: {0}")]
    Recognizer(RecognizerErrorKind),

    #[error("Recognizer has been destroyed")]
    Destroyed,

    #[error("Recognizer already listening")]
    AlreadyListening,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        CoreError::Recognizer(err.to_string())
    }
}
