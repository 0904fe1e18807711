//! Shared test rig that records every rotation with its (paused-clock) timestamp

use async_trait::async_trait;
use kineia_avatar::{AvatarError, SkeletonRig};
use kineia_core::{Joint, Rotation};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRotation {
    pub at_ms: u128,
    pub joint: Joint,
    pub delta: Rotation,
    pub smooth: bool,
}

pub struct RecordingRig {
    start: Instant,
    missing: Vec<Joint>,
    fail_after: Option<usize>,
    calls: Mutex<Vec<RecordedRotation>>,
}

impl RecordingRig {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            missing: Vec::new(),
            fail_after: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn without(missing: &[Joint]) -> Self {
        Self { missing: missing.to_vec(), ..Self::new() }
    }

    /// Renderer starts failing once `n` rotations went through
    pub fn failing_after(n: usize) -> Self {
        Self { fail_after: Some(n), ..Self::new() }
    }

    pub fn calls(&self) -> Vec<RecordedRotation> {
        self.calls.lock().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[async_trait]
impl SkeletonRig for RecordingRig {
    fn rig_name(&self) -> &str {
        "recording"
    }

    fn has_joint(&self, joint: Joint) -> bool {
        !self.missing.contains(&joint)
    }

    async fn rotate(&self, joint: Joint, delta: Rotation, smooth: bool) -> Result<(), AvatarError> {
        let mut calls = self.calls.lock();
        if let Some(limit) = self.fail_after {
            if calls.len() >= limit {
                return Err(AvatarError::Renderer("scene graph detached".to_string()));
            }
        }
        calls.push(RecordedRotation {
            at_ms: self.start.elapsed().as_millis(),
            joint,
            delta,
            smooth,
        });
        Ok(())
    }
}

pub fn rot(x: f32, y: f32, z: f32) -> Rotation {
    Rotation::new(x, y, z)
}
