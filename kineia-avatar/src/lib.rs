//! kineia-avatar: sign-language gestures on a 3D humanoid rig
//!
//! Provides speech-driven gesture playback with:
//! - Hand-authored gesture clips (joint rotations and pauses)
//! - A fixed word → clip dictionary, extendable from clip files
//! - A rig contract for the 3D renderer plus an in-memory scene skeleton
//! - A sequential, timed gesture player

pub mod error;
pub mod gesture;
pub mod signs;
pub mod library;
pub mod skeleton;
pub mod player;

pub use error::AvatarError;
pub use gesture::{GestureClip, GestureClipBuilder, GestureStep};
pub use library::{GestureLibrary, LibraryEntry, WORD_HOLD};
pub use skeleton::{JointUpdate, SceneSkeleton, SkeletonRig};
pub use player::{GesturePlayer, PlaybackFailure, PlaybackReport};
