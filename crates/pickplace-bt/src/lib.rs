//! Behavior tree runtime built on `pickplace-core`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod bt;
pub mod builder;
pub mod nodes;
pub mod policy;
pub mod vars;
pub mod wait;

pub use adapter::{GoalAction, GoalClient, ResultSink};
pub use bt::{BtNode, BtStatus};
pub use builder::{chain, condition, inverter, parallel, selector, sequence, Outline, Stage};
pub use nodes::{Condition, Inverter, Parallel, ParallelPolicy, Selector, Sequence};
pub use policy::BtPolicy;
pub use vars::{CheckVar, ClearVar, ClearingPolicy, SetVar};
pub use wait::{TriggerName, TriggerWorld, WaitTrigger};
