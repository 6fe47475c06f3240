use crate::{ActionRuntime, Blackboard, Policy, TickContext, WorldMut};

/// Owns one policy plus the store and activity slot it drives.
///
/// Each `tick` runs the full cycle in order: clear request marks, let the
/// policy decide, cancel whatever the policy stopped requesting, then poll
/// the surviving activity once.
pub struct Runner<W>
where
    W: WorldMut + 'static,
{
    pub blackboard: Blackboard,
    pub actions: ActionRuntime<W>,
    pub policy: Box<dyn Policy<W>>,
}

impl<W> Runner<W>
where
    W: WorldMut + 'static,
{
    pub fn new(policy: Box<dyn Policy<W>>) -> Self {
        Self {
            blackboard: Blackboard::new(),
            actions: ActionRuntime::default(),
            policy,
        }
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        self.actions.begin_tick();
        self.policy
            .tick(ctx, world, &mut self.blackboard, &mut self.actions);
        self.actions
            .preempt_unrequested(ctx, world, &mut self.blackboard);

        let _ = self.actions.tick(ctx, world, &mut self.blackboard);
    }
}
