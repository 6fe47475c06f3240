use pickplace_core::{ActionRuntime, Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

/// One node of a behavior tree.
///
/// A tick is a single non-blocking evaluation pass; long-running work is
/// reported as `Running` and re-polled next cycle. `reset` clears whatever
/// per-run memory the node keeps (running child index, latched signals); an
/// ancestor calls it when the node's branch is abandoned or completes.
pub trait BtNode<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus;

    fn reset(&mut self);
}
