use std::any::Any;

use thiserror::Error;

use crate::{Blackboard, WorldMut};

/// Name of an external action server, e.g. `"scan_scene"` or `"drop_move"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionName(pub &'static str);

/// Handle to one in-flight goal on an external action server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(pub u64);

/// Lifecycle status an external action server reports for one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
}

impl GoalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GoalStatus::Pending | GoalStatus::Active)
    }
}

/// Opaque goal or result payload ferried between the tree and a server.
///
/// The kernel never inspects payloads; adapters downcast results back to
/// their concrete type when writing them into the store.
pub type GoalPayload = Box<dyn Any + Send>;

/// World extension: non-blocking transport to external action servers.
///
/// `send_goal` must return immediately; progress is observed by polling
/// `goal_status` on later ticks. A rejected dispatch surfaces as
/// [`GoalStatus::Rejected`] rather than a send error. `take_result` yields
/// the result payload at most once, after the goal has succeeded.
pub trait GoalWorld: WorldMut {
    fn send_goal(&mut self, action: ActionName, goal: GoalPayload) -> GoalId;

    fn goal_status(&self, goal: GoalId) -> GoalStatus;

    fn take_result(&mut self, goal: GoalId) -> Option<GoalPayload>;

    fn cancel_goal(&mut self, goal: GoalId);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoalSourceError {
    /// A store key required to assemble the goal payload is absent.
    #[error("missing blackboard key id={0} for goal generation")]
    MissingKey(u64),
}

/// Produce a goal payload from current store contents.
///
/// Implemented once per action type; adapters call it on the tick that
/// dispatches, so generation always sees the latest store state. A missing
/// required key is reported as an error, not a panic: the enclosing tree is
/// expected to route to a fallback branch.
pub trait GoalSource<G>: 'static {
    fn goal(&self, store: &Blackboard) -> Result<G, GoalSourceError>;
}

/// Goal source with a fixed payload, cloned on every dispatch.
pub struct FixedGoal<G: Clone>(pub G);

impl<G: Clone + 'static> GoalSource<G> for FixedGoal<G> {
    fn goal(&self, _store: &Blackboard) -> Result<G, GoalSourceError> {
        Ok(self.0.clone())
    }
}

impl<G, F> GoalSource<G> for F
where
    F: Fn(&Blackboard) -> Result<G, GoalSourceError> + 'static,
{
    fn goal(&self, store: &Blackboard) -> Result<G, GoalSourceError> {
        self(store)
    }
}
