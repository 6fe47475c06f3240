use crate::preempt::PreemptFlag;
use crate::waypoint::{ArmSide, JointTarget, Waypoint};
use crate::world::{MotionWorld, VisitOutcome};

/// Everything one drop-move goal needs: where to navigate and how to park
/// the arms, resolved from configuration before the goal starts.
#[derive(Debug, Clone)]
pub struct DropMovePlan {
    /// Visited first, backing the base out of the grasp area.
    pub retract: Waypoint,
    /// Visited in list order after the arms are parked.
    pub drop_waypoints: Vec<Waypoint>,
    /// Arm holding the grasped object.
    pub carry_arm: ArmSide,
    /// Arm carrying the scan sensor.
    pub scan_arm: ArmSide,
    pub carry_home: JointTarget,
    pub scan_search: JointTarget,
    pub carry_ready: JointTarget,
    pub velocity_scaling: f64,
}

/// Terminal result of one drop-move goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Succeeded,
    Preempted,
    Aborted,
}

/// Where the executor is in its fixed step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropState {
    /// Navigate to the retract waypoint.
    Retract,
    /// Park the carry arm at home and the scan arm at search.
    PrepareArms,
    /// Navigate to drop waypoint `i`.
    DropVisit(usize),
    /// Carry arm to ready, then open its gripper.
    Finish,
    Done(DropOutcome),
}

/// Blocking, step-wise executor for one drop-move goal.
///
/// Runs outside the tick loop and is allowed to block per step. The
/// preemption token is consulted between steps only; cancellation
/// granularity is the step boundary, never mid-motion.
pub struct DropMoveSequence {
    plan: DropMovePlan,
    preempt: PreemptFlag,
    state: DropState,
}

impl DropMoveSequence {
    pub fn new(plan: DropMovePlan, preempt: PreemptFlag) -> Self {
        Self {
            plan,
            preempt,
            state: DropState::Retract,
        }
    }

    pub fn state(&self) -> DropState {
        self.state
    }

    pub fn outcome(&self) -> Option<DropOutcome> {
        match self.state {
            DropState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Perform the current step's blocking work and move to the next state.
    ///
    /// A pending preemption request finalizes the goal before any further
    /// backend call. Once `Done`, further calls do nothing.
    pub fn advance<W>(&mut self, world: &mut W)
    where
        W: MotionWorld,
    {
        if matches!(self.state, DropState::Done(_)) {
            return;
        }
        if self.preempt.is_requested() {
            tracing::info!("Drop-move goal preempted");
            self.state = DropState::Done(DropOutcome::Preempted);
            return;
        }

        self.state = match self.state {
            DropState::Retract => Self::visit(world, &self.plan.retract, DropState::PrepareArms),
            DropState::PrepareArms => {
                let scale = self.plan.velocity_scaling;
                let parked = world
                    .goto_joint_target(self.plan.carry_arm, &self.plan.carry_home, scale)
                    .and_then(|_| {
                        world.goto_joint_target(self.plan.scan_arm, &self.plan.scan_search, scale)
                    });
                match parked {
                    Ok(()) if self.plan.drop_waypoints.is_empty() => DropState::Finish,
                    Ok(()) => DropState::DropVisit(0),
                    Err(err) => {
                        tracing::error!(error = %err, "Arm preparation failed");
                        DropState::Done(DropOutcome::Aborted)
                    }
                }
            }
            DropState::DropVisit(i) => {
                let next = if i + 1 < self.plan.drop_waypoints.len() {
                    DropState::DropVisit(i + 1)
                } else {
                    DropState::Finish
                };
                Self::visit(world, &self.plan.drop_waypoints[i], next)
            }
            DropState::Finish => {
                let released = world
                    .goto_joint_target(
                        self.plan.carry_arm,
                        &self.plan.carry_ready,
                        self.plan.velocity_scaling,
                    )
                    .and_then(|_| world.release_gripper(self.plan.carry_arm));
                match released {
                    Ok(()) => {
                        tracing::info!("Finished drop sequence");
                        DropState::Done(DropOutcome::Succeeded)
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Drop release failed");
                        DropState::Done(DropOutcome::Aborted)
                    }
                }
            }
            DropState::Done(outcome) => DropState::Done(outcome),
        };
    }

    /// Drive the sequence to its terminal outcome.
    pub fn run<W>(mut self, world: &mut W) -> DropOutcome
    where
        W: MotionWorld,
    {
        loop {
            if let DropState::Done(outcome) = self.state {
                return outcome;
            }
            self.advance(world);
        }
    }

    fn visit<W>(world: &mut W, waypoint: &Waypoint, reached: DropState) -> DropState
    where
        W: MotionWorld,
    {
        tracing::debug!(waypoint = %waypoint.name, "Visiting waypoint");
        match world.visit_waypoint(waypoint) {
            VisitOutcome::Reached => reached,
            VisitOutcome::Preempted => {
                tracing::info!(waypoint = %waypoint.name, "Drop-move goal preempted");
                DropState::Done(DropOutcome::Preempted)
            }
            VisitOutcome::Aborted => {
                tracing::error!(waypoint = %waypoint.name, "Failed to reach waypoint");
                DropState::Done(DropOutcome::Aborted)
            }
        }
    }
}
