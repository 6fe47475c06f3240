//! Simulated backend: scripted action servers for scan and grasp, a real
//! drop-move service over an instant motion stub, and trigger plumbing,
//! all behind the kernel's world traits.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pickplace_bt::{TriggerName, TriggerWorld};
use pickplace_core::{
    ActionName, GoalId, GoalPayload, GoalStatus, GoalWorld, WorldMut, WorldView,
};
use pickplace_motion::{
    ArmSide, JointTarget, MotionError, MotionWorld, VisitOutcome, Waypoint,
};
use thiserror::Error;

use crate::config::DemoConfig;
use crate::service::DropMoveService;
use crate::tree::{DROP_ACTION, GRASP_ACTION, RESET_TRIGGER, SCAN_ACTION};

/// Startup failure: a required action server never came up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("action server {0} unavailable")]
    ServerUnavailable(&'static str),
}

/// In-process stand-in for one action server.
///
/// Accepts a goal immediately, stays Active for a scripted number of
/// [`step`](Self::step) cycles, then finishes Succeeded (with the scripted
/// result, if any) or Aborted. Accepting while a goal is in flight preempts
/// the in-flight goal, actionlib-style.
pub struct ScriptedAction {
    name: ActionName,
    /// Cycles a goal stays Active before finishing; minimum one.
    pub ticks_to_complete: u32,
    /// When set, the next accepted goal finishes Aborted.
    pub fail_next: bool,
    success_pose: Option<Vec<f64>>,
    active: Option<ActiveGoal>,
    finished: BTreeMap<GoalId, GoalStatus>,
    results: BTreeMap<GoalId, Vec<f64>>,
    /// Goal payloads received, in arrival order.
    pub received: Vec<GoalPayload>,
    /// Cancellation requests observed, in arrival order.
    pub canceled: Vec<GoalId>,
}

struct ActiveGoal {
    id: GoalId,
    remaining: u32,
    abort: bool,
}

impl ScriptedAction {
    pub fn new(name: ActionName, ticks_to_complete: u32) -> Self {
        Self {
            name,
            ticks_to_complete,
            fail_next: false,
            success_pose: None,
            active: None,
            finished: BTreeMap::new(),
            results: BTreeMap::new(),
            received: Vec::new(),
            canceled: Vec::new(),
        }
    }

    /// Result payload every successful goal produces.
    pub fn with_success_pose(mut self, pose: Vec<f64>) -> Self {
        self.success_pose = Some(pose);
        self
    }

    fn accept(&mut self, id: GoalId, goal: GoalPayload) {
        // A new goal obsoletes the records of every goal before it; only
        // the displaced one keeps a readable terminal status.
        self.finished.clear();
        self.results.clear();

        if let Some(previous) = self.active.take() {
            tracing::debug!(
                action = self.name.0,
                goal = previous.id.0,
                "Sim goal preempted by a newer one"
            );
            self.finished.insert(previous.id, GoalStatus::Preempted);
        }

        self.received.push(goal);
        let abort = std::mem::take(&mut self.fail_next);
        self.active = Some(ActiveGoal {
            id,
            remaining: self.ticks_to_complete,
            abort,
        });
    }

    fn status(&self, id: GoalId) -> GoalStatus {
        if self.active.as_ref().is_some_and(|a| a.id == id) {
            return GoalStatus::Active;
        }
        self.finished
            .get(&id)
            .copied()
            .unwrap_or(GoalStatus::Rejected)
    }

    fn take_result(&mut self, id: GoalId) -> Option<GoalPayload> {
        self.results
            .remove(&id)
            .map(|pose| Box::new(pose) as GoalPayload)
    }

    fn cancel(&mut self, id: GoalId) {
        self.canceled.push(id);
        if self.active.as_ref().is_some_and(|a| a.id == id) {
            self.active = None;
            self.finished.insert(id, GoalStatus::Preempted);
        }
    }

    /// Advance the in-flight goal by one cycle.
    pub fn step(&mut self) {
        let finished = match self.active.as_mut() {
            Some(active) if active.remaining > 1 => {
                active.remaining -= 1;
                None
            }
            Some(_) => self.active.take(),
            None => None,
        };

        let Some(goal) = finished else { return };

        if goal.abort {
            tracing::debug!(action = self.name.0, goal = goal.id.0, "Sim goal aborted");
            self.finished.insert(goal.id, GoalStatus::Aborted);
        } else {
            if let Some(pose) = &self.success_pose {
                self.results.insert(goal.id, pose.clone());
            }
            tracing::debug!(action = self.name.0, goal = goal.id.0, "Sim goal succeeded");
            self.finished.insert(goal.id, GoalStatus::Succeeded);
        }
    }
}

/// Instant motion backend: every command succeeds and is appended to a
/// shared command log.
#[derive(Clone, Default)]
pub struct SimRobot {
    log: Arc<Mutex<Vec<String>>>,
}

impl SimRobot {
    /// Handle for reading the command log after the robot has been moved
    /// into the drop-move service.
    pub fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }

    fn record(&self, line: String) {
        let mut log = match self.log.lock() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner(),
        };
        log.push(line);
    }
}

impl WorldView for SimRobot {}
impl WorldMut for SimRobot {}

impl MotionWorld for SimRobot {
    fn visit_waypoint(&mut self, waypoint: &Waypoint) -> VisitOutcome {
        self.record(format!("visit {}", waypoint.name));
        VisitOutcome::Reached
    }

    fn goto_joint_target(
        &mut self,
        side: ArmSide,
        target: &JointTarget,
        velocity_scaling: f64,
    ) -> Result<(), MotionError> {
        self.record(format!("goto {side} {} {velocity_scaling}", target.name));
        Ok(())
    }

    fn release_gripper(&mut self, side: ArmSide) -> Result<(), MotionError> {
        self.record(format!("release {side}"));
        Ok(())
    }
}

/// Which backend owns a dispatched goal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Scan,
    Grasp,
    Drop,
}

/// The demo's whole world: two scripted servers, the drop-move service,
/// and operator triggers.
///
/// Call [`step`](Self::step) once per cycle, before the tree ticks, so the
/// scripted servers make progress; the drop-move service progresses on its
/// own thread.
pub struct SimWorld {
    next_goal_id: u64,
    owners: BTreeMap<GoalId, Owner>,
    pub scanner: ScriptedAction,
    pub grasper: ScriptedAction,
    drop_service: DropMoveService,
    pending_triggers: BTreeMap<&'static str, u32>,
    auto_proceed: bool,
    offline: BTreeSet<&'static str>,
}

impl SimWorld {
    pub fn new(config: &DemoConfig) -> Self {
        Self::with_robot(config, SimRobot::default())
    }

    /// Build with a caller-supplied motion backend.
    pub fn with_robot<R>(config: &DemoConfig, robot: R) -> Self
    where
        R: MotionWorld + Send + 'static,
    {
        Self {
            next_goal_id: 1,
            owners: BTreeMap::new(),
            scanner: ScriptedAction::new(SCAN_ACTION, 3)
                .with_success_pose(vec![0.42, 0.08, 0.23, 0.0, 0.0, 0.0, 1.0]),
            grasper: ScriptedAction::new(GRASP_ACTION, 4),
            drop_service: DropMoveService::spawn(config.drop.plan(), robot),
            pending_triggers: BTreeMap::new(),
            auto_proceed: false,
            offline: BTreeSet::new(),
        }
    }

    /// Queue one operator trigger press.
    pub fn press(&mut self, trigger: TriggerName) {
        *self.pending_triggers.entry(trigger.0).or_default() += 1;
    }

    /// Grant every progression gate without a press; reset stays manual.
    pub fn set_auto_proceed(&mut self, auto: bool) {
        self.auto_proceed = auto;
    }

    /// Mark a server as never coming up, for startup tests.
    pub fn take_offline(&mut self, action: ActionName) {
        self.offline.insert(action.0);
    }

    /// Advance the scripted servers by one cycle.
    pub fn step(&mut self) {
        self.scanner.step();
        self.grasper.step();
    }

    /// Block until every action server is reachable.
    pub fn wait_for_servers(&self, timeout: Duration) -> Result<(), SetupError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.offline.iter().next().copied() {
                None => return Ok(()),
                Some(name) if Instant::now() >= deadline => {
                    return Err(SetupError::ServerUnavailable(name));
                }
                Some(_) => std::thread::sleep(Duration::from_millis(10)),
            }
        }
    }
}

impl WorldView for SimWorld {}
impl WorldMut for SimWorld {}

impl GoalWorld for SimWorld {
    fn send_goal(&mut self, action: ActionName, goal: GoalPayload) -> GoalId {
        // Routing entries for finished goals are dead weight; each dispatch
        // sweeps them so the table tracks live goals only.
        let scanner = &self.scanner;
        let grasper = &self.grasper;
        let drop_service = &self.drop_service;
        self.owners.retain(|id, owner| {
            let status = match owner {
                Owner::Scan => scanner.status(*id),
                Owner::Grasp => grasper.status(*id),
                Owner::Drop => drop_service.status(*id),
            };
            !status.is_terminal()
        });

        let id = GoalId(self.next_goal_id);
        self.next_goal_id += 1;

        if action == SCAN_ACTION {
            self.owners.insert(id, Owner::Scan);
            self.scanner.accept(id, goal);
        } else if action == GRASP_ACTION {
            self.owners.insert(id, Owner::Grasp);
            self.grasper.accept(id, goal);
        } else if action == DROP_ACTION {
            self.owners.insert(id, Owner::Drop);
            self.drop_service.submit(id);
        } else {
            tracing::warn!(action = action.0, goal = id.0, "Goal for unknown action rejected");
        }

        id
    }

    fn goal_status(&self, goal: GoalId) -> GoalStatus {
        match self.owners.get(&goal) {
            Some(Owner::Scan) => self.scanner.status(goal),
            Some(Owner::Grasp) => self.grasper.status(goal),
            Some(Owner::Drop) => self.drop_service.status(goal),
            None => GoalStatus::Rejected,
        }
    }

    fn take_result(&mut self, goal: GoalId) -> Option<GoalPayload> {
        let result = match self.owners.get(&goal) {
            Some(Owner::Scan) => self.scanner.take_result(goal),
            Some(Owner::Grasp) => self.grasper.take_result(goal),
            _ => None,
        };
        // Consuming the result is the last transaction for a goal.
        if result.is_some() {
            self.owners.remove(&goal);
        }
        result
    }

    fn cancel_goal(&mut self, goal: GoalId) {
        // Cancellation is the caller declaring disinterest; the id is dead.
        match self.owners.remove(&goal) {
            Some(Owner::Scan) => self.scanner.cancel(goal),
            Some(Owner::Grasp) => self.grasper.cancel(goal),
            Some(Owner::Drop) => self.drop_service.cancel(goal),
            None => {}
        }
    }
}

impl TriggerWorld for SimWorld {
    fn take_trigger(&mut self, trigger: TriggerName) -> bool {
        if self.auto_proceed && trigger != RESET_TRIGGER {
            return true;
        }

        match self.pending_triggers.get_mut(trigger.0) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}
