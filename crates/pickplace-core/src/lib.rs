//! Driver-agnostic coordination kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod goal;
pub mod policy;
pub mod runner;
pub mod tick;
pub mod world;

pub use action::{Action, ActionKey, ActionOutcome, ActionRuntime, ActionStatus};
pub use blackboard::{BbKey, Blackboard};
pub use goal::{
    ActionName, FixedGoal, GoalId, GoalPayload, GoalSource, GoalSourceError, GoalStatus, GoalWorld,
};
pub use policy::Policy;
pub use runner::Runner;
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
