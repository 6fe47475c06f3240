/// Read-only access to the robot-facing world.
///
/// The kernel intentionally does not prescribe which queries a world must
/// expose; subsystems (goal transport, triggers, motion) define extension
/// traits on top of these markers, and test worlds implement only what the
/// code under test touches.
pub trait WorldView {}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
