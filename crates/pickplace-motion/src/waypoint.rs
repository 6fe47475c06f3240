use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named navigation target.
///
/// The pose is opaque to this crate; only the backend servicing
/// `visit_waypoint` interprets it. The name identifies the waypoint in logs
/// when a visit fails.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    pub name: String,
    pub pose: Vec<f64>,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, pose: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            pose,
        }
    }
}

/// Named joint-space configuration for one arm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointTarget {
    pub name: String,
    pub positions: Vec<f64>,
}

impl JointTarget {
    pub fn new(name: impl Into<String>, positions: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }
}

/// Which arm of the dual-arm robot a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArmSide {
    Left,
    Right,
}

impl fmt::Display for ArmSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmSide::Left => f.write_str("left"),
            ArmSide::Right => f.write_str("right"),
        }
    }
}
