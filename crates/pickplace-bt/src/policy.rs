use pickplace_core::{ActionRuntime, Blackboard, Policy, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};

/// Drives a behavior tree as the runner's policy: one root tick per cycle,
/// resetting the tree whenever it finishes so the next cycle re-derives
/// everything from the store.
pub struct BtPolicy<W>
where
    W: WorldMut + 'static,
{
    root: Box<dyn BtNode<W>>,
    last: BtStatus,
}

impl<W> BtPolicy<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Box<dyn BtNode<W>>) -> Self {
        Self {
            root,
            last: BtStatus::Running,
        }
    }

    pub fn last_status(&self) -> BtStatus {
        self.last
    }
}

impl<W> Policy<W> for BtPolicy<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) {
        self.last = self.root.tick(ctx, world, blackboard, actions);
        if self.last != BtStatus::Running {
            self.root.reset();
        }
    }
}
