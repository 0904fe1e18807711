//! Error types for kineia-app

use kineia_account::AccountError;
use kineia_avatar::AvatarError;
use kineia_core::{ConfigError, Error as CoreError};
use kineia_speech::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Avatar error: {0}")]
    Avatar(#[from] AvatarError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recognizer events already taken by another screen")]
    EventsTaken,

    #[error("Screen has been closed")]
    ScreenClosed,
}

impl From<AppError> for CoreError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Speech(e) => e.into(),
            AppError::Avatar(e) => e.into(),
            AppError::Account(e) => e.into(),
            AppError::Config(e) => e.into(),
            other => CoreError::Playback(other.to_string()),
        }
    }
}
