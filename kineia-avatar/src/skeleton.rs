//! Skeleton rig contract and the in-memory scene skeleton

use crate::error::AvatarError;
use async_trait::async_trait;
use kineia_core::{Joint, Rotation};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::debug;

/// Renderer side of playback: something that owns a scene graph and can turn
/// named joints.
#[async_trait]
pub trait SkeletonRig: Send + Sync {
    fn rig_name(&self) -> &str;

    fn has_joint(&self, joint: Joint) -> bool;

    /// Add `delta` to the joint's current rotation, optionally smoothed by the renderer
    async fn rotate(&self, joint: Joint, delta: Rotation, smooth: bool) -> Result<(), AvatarError>;
}

/// Emitted for every applied rotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointUpdate {
    pub joint: Joint,
    pub delta: Rotation,
    /// Joint rotation after the delta
    pub rotation: Rotation,
    pub smooth: bool,
}

#[derive(Debug, Clone)]
struct JointNode {
    parent: Option<Joint>,
    rotation: Rotation,
}

/// Node tree of the humanoid avatar kept in memory.
///
/// Stands in for the model loaded by the 3D renderer: it tracks each joint's
/// accumulated rotation and broadcasts every change so a renderer or logger
/// can follow along.
pub struct SceneSkeleton {
    name: String,
    nodes: RwLock<HashMap<Joint, JointNode>>,
    updates: broadcast::Sender<JointUpdate>,
}

impl SceneSkeleton {
    const UPDATE_BUFFER_SIZE: usize = 256;

    /// Rig with every arm and hand joint at rest
    pub fn humanoid() -> Self {
        Self::with_joints("humanoid", &Joint::ALL)
    }

    /// Rig containing only `joints`
    pub fn with_joints(name: impl Into<String>, joints: &[Joint]) -> Self {
        let nodes = joints
            .iter()
            .map(|joint| {
                let parent = joint.parent().filter(|p| joints.contains(p));
                (*joint, JointNode { parent, rotation: Rotation::ZERO })
            })
            .collect();
        let (updates, _) = broadcast::channel(Self::UPDATE_BUFFER_SIZE);

        Self {
            name: name.into(),
            nodes: RwLock::new(nodes),
            updates,
        }
    }

    /// Humanoid rig missing some joints (e.g. a model exported without finger bones)
    pub fn humanoid_without(missing: &[Joint]) -> Self {
        let joints: Vec<Joint> = Joint::ALL
            .iter()
            .copied()
            .filter(|joint| !missing.contains(joint))
            .collect();
        Self::with_joints("humanoid", &joints)
    }

    pub fn rotation_of(&self, joint: Joint) -> Option<Rotation> {
        self.nodes.read().get(&joint).map(|node| node.rotation)
    }

    pub fn parent_of(&self, joint: Joint) -> Option<Joint> {
        self.nodes.read().get(&joint).and_then(|node| node.parent)
    }

    pub fn children_of(&self, joint: Joint) -> Vec<Joint> {
        let mut children: Vec<Joint> = self
            .nodes
            .read()
            .iter()
            .filter(|(_, node)| node.parent == Some(joint))
            .map(|(child, _)| *child)
            .collect();
        children.sort();
        children
    }

    /// Joints present in the rig, sorted
    pub fn joints(&self) -> Vec<Joint> {
        let mut joints: Vec<Joint> = self.nodes.read().keys().copied().collect();
        joints.sort();
        joints
    }

    /// True when every joint is back at rest
    pub fn is_at_rest(&self) -> bool {
        self.nodes.read().values().all(|node| node.rotation.is_zero())
    }

    /// Put every joint back at rest
    pub fn reset(&self) {
        for node in self.nodes.write().values_mut() {
            node.rotation = Rotation::ZERO;
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JointUpdate> {
        self.updates.subscribe()
    }
}

#[async_trait]
impl SkeletonRig for SceneSkeleton {
    fn rig_name(&self) -> &str {
        &self.name
    }

    fn has_joint(&self, joint: Joint) -> bool {
        self.nodes.read().contains_key(&joint)
    }

    async fn rotate(&self, joint: Joint, delta: Rotation, smooth: bool) -> Result<(), AvatarError> {
        if !delta.is_finite() {
            return Err(AvatarError::Renderer(format!("non-finite rotation for {}", joint)));
        }

        let rotation = {
            let mut nodes = self.nodes.write();
            let node = nodes.get_mut(&joint).ok_or(AvatarError::JointNotFound(joint))?;
            node.rotation += delta;
            node.rotation
        };

        debug!("{} {} -> {}", joint, delta, rotation);
        // no subscribers is fine
        let _ = self.updates.send(JointUpdate { joint, delta, rotation, smooth });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rotations_accumulate() {
        let rig = SceneSkeleton::humanoid();
        rig.rotate(Joint::UpperArmR, Rotation::new(90.0, 0.0, 0.0), true).await.unwrap();
        rig.rotate(Joint::UpperArmR, Rotation::new(-30.0, 10.0, 0.0), true).await.unwrap();
        assert_eq!(rig.rotation_of(Joint::UpperArmR), Some(Rotation::new(60.0, 10.0, 0.0)));
        assert!(!rig.is_at_rest());

        rig.reset();
        assert!(rig.is_at_rest());
    }

    #[tokio::test]
    async fn test_missing_joint() {
        let rig = SceneSkeleton::humanoid_without(&[Joint::ThumbR]);
        assert!(!rig.has_joint(Joint::ThumbR));
        let err = rig.rotate(Joint::ThumbR, Rotation::new(0.0, -90.0, 0.0), false).await;
        assert!(matches!(err, Err(AvatarError::JointNotFound(Joint::ThumbR))));
    }

    #[tokio::test]
    async fn test_updates_are_broadcast() {
        let rig = SceneSkeleton::humanoid();
        let mut updates = rig.subscribe();
        rig.rotate(Joint::HandL, Rotation::new(0.0, 130.0, 0.0), true).await.unwrap();

        let update = updates.recv().await.unwrap();
        assert_eq!(update.joint, Joint::HandL);
        assert_eq!(update.rotation, Rotation::new(0.0, 130.0, 0.0));
        assert!(update.smooth);
    }

    #[test]
    fn test_hierarchy() {
        let rig = SceneSkeleton::humanoid();
        assert_eq!(rig.parent_of(Joint::ForearmR), Some(Joint::UpperArmR));
        assert_eq!(
            rig.children_of(Joint::HandR),
            vec![Joint::IndexR, Joint::MiddleR, Joint::RingR, Joint::PinkyR, Joint::ThumbR]
        );

        // a finger whose hand is missing hangs off nothing
        let partial = SceneSkeleton::humanoid_without(&[Joint::HandR]);
        assert_eq!(partial.parent_of(Joint::IndexR), None);
    }
}
