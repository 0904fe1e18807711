//! kineia-core: shared building blocks for the kineia workspace
//!
//! - Rig vocabulary (`Joint`) and Euler rotation deltas (`Rotation`)
//! - Workspace-wide error type
//! - Layered configuration (defaults, file, environment)
//! - User-facing notification contract

pub mod types;
pub mod error;
pub mod config;
pub mod notify;

pub use error::{Error, Result};
pub use types::{Joint, Rotation};
pub use config::{KineiaConfig, InstanceConfig, PlaybackConfig, SpeechConfig, ModelConfig, ConfigError};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier, CollectingNotifier};
