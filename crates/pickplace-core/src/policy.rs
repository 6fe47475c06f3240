use crate::{ActionRuntime, Blackboard, TickContext, WorldMut};

/// One decision pass per cycle. A policy inspects the world and the store and
/// marks the activities it wants alive on the runtime; it never blocks.
pub trait Policy<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    );
}
