//! Motion primitives (waypoints, joint targets, and the drop-move executor).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod executor;
pub mod preempt;
pub mod waypoint;
pub mod world;

pub use executor::{DropMovePlan, DropMoveSequence, DropOutcome, DropState};
pub use preempt::PreemptFlag;
pub use waypoint::{ArmSide, JointTarget, Waypoint};
pub use world::{MotionError, MotionWorld, VisitOutcome};
