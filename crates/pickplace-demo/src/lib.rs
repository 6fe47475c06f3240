//! Scan, grasp, and drop demo: tree assemblies, configuration, and the
//! simulated robot backend they run against.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod service;
pub mod sim;
pub mod tree;

pub use config::{DemoConfig, DropConfig};
pub use service::DropMoveService;
pub use sim::{ScriptedAction, SetupError, SimRobot, SimWorld};
pub use tree::{demo_tree, staged_tree, DropMoveGoal, GraspGoal, ScanGoal};
