//! Demo configuration.
//!
//! Everything has a default, so a missing or partial YAML file still
//! yields a runnable demo.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use pickplace_motion::{ArmSide, DropMovePlan, JointTarget, Waypoint};
use serde::{Deserialize, Serialize};

/// Top-level demo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Tree tick period in milliseconds.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// How long startup waits for action servers, in milliseconds.
    #[serde(default = "default_setup_timeout_ms")]
    pub setup_timeout_ms: u64,

    /// Number of viewpoints the scan action sweeps through.
    #[serde(default = "default_scan_pose_count")]
    pub scan_pose_count: u32,

    /// Route and arm parks for the drop-move executor.
    #[serde(default)]
    pub drop: DropConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            setup_timeout_ms: default_setup_timeout_ms(),
            scan_pose_count: default_scan_pose_count(),
            drop: DropConfig::default(),
        }
    }
}

fn default_tick_period_ms() -> u64 {
    100
}

fn default_setup_timeout_ms() -> u64 {
    15_000
}

fn default_scan_pose_count() -> u32 {
    5
}

impl DemoConfig {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when one is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_millis(self.setup_timeout_ms)
    }
}

/// Waypoint route and joint targets for the drop move.
///
/// The carry arm holds the object; the scan arm is parked out of the way
/// while the base drives the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    pub retract_waypoint: Waypoint,
    pub drop_waypoints: Vec<Waypoint>,
    pub carry_arm: ArmSide,
    pub scan_arm: ArmSide,
    pub carry_home: JointTarget,
    pub scan_search: JointTarget,
    pub carry_ready: JointTarget,
    #[serde(default = "default_velocity_scaling")]
    pub velocity_scaling: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            retract_waypoint: Waypoint::new("retract", vec![-0.6, 0.0, 0.0]),
            drop_waypoints: vec![
                Waypoint::new("hallway", vec![1.2, 0.4, 0.0]),
                Waypoint::new("drop_zone", vec![2.4, 0.8, 1.57]),
            ],
            carry_arm: ArmSide::Left,
            scan_arm: ArmSide::Right,
            carry_home: JointTarget::new(
                "carry_home",
                vec![0.0, -2.26, 2.35, 0.52, 0.0, 0.7, 0.0],
            ),
            scan_search: JointTarget::new(
                "scan_search",
                vec![1.17, -1.9, 1.9, 0.35, 0.0, 0.52, 0.0],
            ),
            carry_ready: JointTarget::new(
                "carry_ready",
                vec![0.0, -1.7, 1.6, 0.8, 0.0, 0.35, 0.0],
            ),
            velocity_scaling: default_velocity_scaling(),
        }
    }
}

fn default_velocity_scaling() -> f64 {
    0.5
}

impl DropConfig {
    /// Resolve into the executor's immutable plan.
    pub fn plan(&self) -> DropMovePlan {
        DropMovePlan {
            retract: self.retract_waypoint.clone(),
            drop_waypoints: self.drop_waypoints.clone(),
            carry_arm: self.carry_arm,
            scan_arm: self.scan_arm,
            carry_home: self.carry_home.clone(),
            scan_search: self.scan_search.clone(),
            carry_ready: self.carry_ready.clone(),
            velocity_scaling: self.velocity_scaling,
        }
    }
}
