//! Error types for kineia-account

use kineia_core::Error as CoreError;
use thiserror::Error;

/// Account, credential and profile errors
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be between {min} and {max} bytes")]
    InvalidPassword { min: usize, max: usize },

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid sign-in token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Profile store error: {0}")]
    Store(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<AccountError> for CoreError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Store(msg) => CoreError::Storage(msg),
            other => CoreError::Auth(other.to_string()),
        }
    }
}
