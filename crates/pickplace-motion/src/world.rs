use pickplace_core::WorldMut;
use thiserror::Error;

use crate::waypoint::{ArmSide, JointTarget, Waypoint};

/// Terminal report of one blocking waypoint visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    Reached,
    Preempted,
    Aborted,
}

/// Failure raised by a blocking arm command.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("{side} arm failed to reach joint target {target}")]
    JointMove { side: ArmSide, target: String },

    #[error("{side} gripper failed to release")]
    Release { side: ArmSide },
}

/// World extension for the blocking motion backend the drop-move executor
/// drives.
///
/// Every call blocks until the command settles. A cancellation the backend
/// itself honors mid-visit surfaces as [`VisitOutcome::Preempted`]; arm
/// commands carry no preemption vocabulary and either complete or fail.
pub trait MotionWorld: WorldMut {
    fn visit_waypoint(&mut self, waypoint: &Waypoint) -> VisitOutcome;

    fn goto_joint_target(
        &mut self,
        side: ArmSide,
        target: &JointTarget,
        velocity_scaling: f64,
    ) -> Result<(), MotionError>;

    fn release_gripper(&mut self, side: ArmSide) -> Result<(), MotionError>;
}
