use pickplace_core::{ActionRuntime, Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};

/// Identity of one discrete operator signal, e.g. `TriggerName("scan")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerName(pub &'static str);

/// World extension for content-free "proceed" signals.
pub trait TriggerWorld: WorldMut {
    /// Consume one pending signal. `true` if one had arrived since the last
    /// take; further takes return `false` until the next arrival.
    fn take_trigger(&mut self, trigger: TriggerName) -> bool;
}

/// Gates progression on an operator signal: Running until one arrives, then
/// latches Success until reset.
pub struct WaitTrigger {
    trigger: TriggerName,
    latched: bool,
}

impl WaitTrigger {
    pub fn new(trigger: TriggerName) -> Self {
        Self {
            trigger,
            latched: false,
        }
    }
}

impl<W> BtNode<W> for WaitTrigger
where
    W: TriggerWorld + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        world: &mut W,
        _blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if !self.latched && world.take_trigger(self.trigger) {
            self.latched = true;
        }

        if self.latched {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn reset(&mut self) {
        self.latched = false;
    }
}
