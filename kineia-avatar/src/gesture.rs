//! Gesture clips: hand-authored joint rotations with pauses in between

use crate::error::AvatarError;
use kineia_core::{Joint, Rotation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest single pause a clip may hold
pub const MAX_PAUSE_MS: u64 = 10_000;

/// One instruction of a gesture clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GestureStep {
    /// Add `delta` to the joint's current rotation
    Rotate { joint: Joint, delta: Rotation },
    /// Hold the pose
    Pause { ms: u64 },
}

impl GestureStep {
    pub fn pause(&self) -> Option<Duration> {
        match self {
            GestureStep::Pause { ms } => Some(Duration::from_millis(*ms)),
            GestureStep::Rotate { .. } => None,
        }
    }
}

/// Named, ordered sequence of steps representing one sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureClip {
    name: String,
    steps: Vec<GestureStep>,
}

impl GestureClip {
    pub fn builder(name: impl Into<String>) -> GestureClipBuilder {
        GestureClipBuilder {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Build a clip from already-authored steps, checking them
    pub fn from_steps(name: impl Into<String>, steps: Vec<GestureStep>) -> Result<Self, AvatarError> {
        let clip = Self { name: name.into(), steps };
        clip.validate()?;
        Ok(clip)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[GestureStep] {
        &self.steps
    }

    /// Distinct joints in order of first use
    pub fn joints(&self) -> Vec<Joint> {
        let mut joints = Vec::new();
        for step in &self.steps {
            if let GestureStep::Rotate { joint, .. } = step {
                if !joints.contains(joint) {
                    joints.push(*joint);
                }
            }
        }
        joints
    }

    /// Sum of all pauses inside the clip
    pub fn total_pause(&self) -> Duration {
        self.steps.iter().filter_map(GestureStep::pause).sum()
    }

    /// Accumulated rotation the clip leaves on `joint`
    pub fn net_rotation(&self, joint: Joint) -> Rotation {
        self.steps
            .iter()
            .filter_map(|step| match step {
                GestureStep::Rotate { joint: j, delta } if *j == joint => Some(*delta),
                _ => None,
            })
            .fold(Rotation::ZERO, |acc, delta| acc + delta)
    }

    /// True when every touched joint ends where it started
    pub fn returns_to_rest(&self) -> bool {
        self.joints().into_iter().all(|joint| self.net_rotation(joint).is_zero())
    }

    pub fn validate(&self) -> Result<(), AvatarError> {
        if self.name.trim().is_empty() {
            return Err(AvatarError::Clip("clip name cannot be empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(AvatarError::Clip(format!("clip '{}' has no steps", self.name)));
        }
        for step in &self.steps {
            match step {
                GestureStep::Rotate { delta, joint } if !delta.is_finite() => {
                    return Err(AvatarError::Clip(format!(
                        "clip '{}' rotates {} by a non-finite angle",
                        self.name, joint
                    )));
                }
                GestureStep::Pause { ms } if *ms > MAX_PAUSE_MS => {
                    return Err(AvatarError::Clip(format!(
                        "clip '{}' pauses {} ms (max {} ms)",
                        self.name, ms, MAX_PAUSE_MS
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Fluent authoring of clips
#[derive(Debug, Clone)]
pub struct GestureClipBuilder {
    name: String,
    steps: Vec<GestureStep>,
}

impl GestureClipBuilder {
    pub fn rotate(mut self, joint: Joint, x: f32, y: f32, z: f32) -> Self {
        self.steps.push(GestureStep::Rotate {
            joint,
            delta: Rotation::new(x, y, z),
        });
        self
    }

    pub fn pause_ms(mut self, ms: u64) -> Self {
        self.steps.push(GestureStep::Pause { ms });
        self
    }

    pub fn build(self) -> Result<GestureClip, AvatarError> {
        GestureClip::from_steps(self.name, self.steps)
    }

    /// Unchecked build for the compiled-in sign table (covered by its tests)
    pub(crate) fn finish(self) -> GestureClip {
        GestureClip {
            name: self.name,
            steps: self.steps,
        }
    }
}
