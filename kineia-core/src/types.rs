use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// Rotatable node of the avatar rig.
///
/// Names follow the rig exported with the humanoid model (`upper_arm.R`,
/// `f_index.02.R`, ...), so clips authored against the model parse directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Joint {
    #[serde(rename = "upper_arm.R")]
    UpperArmR,
    #[serde(rename = "upper_arm.L")]
    UpperArmL,
    #[serde(rename = "forearm.R")]
    ForearmR,
    #[serde(rename = "forearm.L")]
    ForearmL,
    #[serde(rename = "hand.R")]
    HandR,
    #[serde(rename = "hand.L")]
    HandL,
    #[serde(rename = "f_index.02.R")]
    IndexR,
    #[serde(rename = "f_middle.02.R")]
    MiddleR,
    #[serde(rename = "f_ring.02.R")]
    RingR,
    #[serde(rename = "f_pinky.02.R")]
    PinkyR,
    #[serde(rename = "thumb.02.R")]
    ThumbR,
}

impl Joint {
    pub const ALL: [Joint; 11] = [
        Joint::UpperArmR,
        Joint::UpperArmL,
        Joint::ForearmR,
        Joint::ForearmL,
        Joint::HandR,
        Joint::HandL,
        Joint::IndexR,
        Joint::MiddleR,
        Joint::RingR,
        Joint::PinkyR,
        Joint::ThumbR,
    ];

    /// Node name in the rig
    pub fn rig_name(&self) -> &'static str {
        match self {
            Joint::UpperArmR => "upper_arm.R",
            Joint::UpperArmL => "upper_arm.L",
            Joint::ForearmR => "forearm.R",
            Joint::ForearmL => "forearm.L",
            Joint::HandR => "hand.R",
            Joint::HandL => "hand.L",
            Joint::IndexR => "f_index.02.R",
            Joint::MiddleR => "f_middle.02.R",
            Joint::RingR => "f_ring.02.R",
            Joint::PinkyR => "f_pinky.02.R",
            Joint::ThumbR => "thumb.02.R",
        }
    }

    /// Parent joint in the arm chain. Upper arms hang off the (unrigged) torso.
    pub fn parent(&self) -> Option<Joint> {
        match self {
            Joint::UpperArmR | Joint::UpperArmL => None,
            Joint::ForearmR => Some(Joint::UpperArmR),
            Joint::ForearmL => Some(Joint::UpperArmL),
            Joint::HandR => Some(Joint::ForearmR),
            Joint::HandL => Some(Joint::ForearmL),
            Joint::IndexR | Joint::MiddleR | Joint::RingR | Joint::PinkyR | Joint::ThumbR => {
                Some(Joint::HandR)
            }
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.rig_name())
    }
}

impl FromStr for Joint {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Joint::ALL
            .iter()
            .copied()
            .find(|joint| joint.rig_name() == s.trim())
            .ok_or_else(|| crate::Error::JointNotFound(s.to_string()))
    }
}

/// Euler rotation in degrees, used both as a joint pose and as a delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        const EPSILON: f32 = 1e-3;
        self.x.abs() < EPSILON && self.y.abs() < EPSILON && self.z.abs() < EPSILON
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, rhs: Rotation) -> Rotation {
        Rotation::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Rotation {
    fn add_assign(&mut self, rhs: Rotation) {
        *self = *self + rhs;
    }
}

impl Sub for Rotation {
    type Output = Rotation;

    fn sub(self, rhs: Rotation) -> Rotation {
        Rotation::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Rotation {
    type Output = Rotation;

    fn neg(self) -> Rotation {
        Rotation::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.0}, {:+.0}, {:+.0})", self.x, self.y, self.z)
    }
}
