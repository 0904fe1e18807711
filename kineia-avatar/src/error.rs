//! Error types for kineia-avatar

use kineia_core::{Error as CoreError, Joint};
use thiserror::Error;

/// Gesture and rig errors
#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Joint not found in rig: {0}")]
    JointNotFound(Joint),

    #[error("Invalid gesture clip: {0}")]
    Clip(String),

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Clip file parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl From<AvatarError> for CoreError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::JointNotFound(joint) => CoreError::JointNotFound(joint.to_string()),
            other => CoreError::Playback(format!("Avatar error: {}", other)),
        }
    }
}
