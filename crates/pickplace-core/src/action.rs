use crate::{Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure,
}

impl From<ActionOutcome> for ActionStatus {
    fn from(value: ActionOutcome) -> Self {
        match value {
            ActionOutcome::Success => ActionStatus::Success,
            ActionOutcome::Failure => ActionStatus::Failure,
        }
    }
}

impl ActionStatus {
    pub fn outcome(self) -> Option<ActionOutcome> {
        match self {
            ActionStatus::Running => None,
            ActionStatus::Success => Some(ActionOutcome::Success),
            ActionStatus::Failure => Some(ActionOutcome::Failure),
        }
    }
}

/// Identity of one logical long-running activity, e.g. `ActionKey("scan")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey(pub &'static str);

/// A long-running activity driven by the runner, one poll per cycle.
///
/// `cancel` is invoked when the tree stops requesting the activity while it
/// is still running; implementations must propagate the cancellation to
/// whatever external work they started.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus;

    fn cancel(&mut self, _ctx: &TickContext, _world: &mut W, _blackboard: &mut Blackboard) {}
}

struct RunningAction<W>
where
    W: WorldMut + 'static,
{
    key: ActionKey,
    action: Box<dyn Action<W>>,
}

/// Single-slot activity runtime.
///
/// At most one action is current at a time. Tree nodes re-request their key
/// on every tick they want the activity alive; after each policy pass the
/// runner cancels whatever is current but was not requested. Requesting a
/// different key than the current one cancels the current action first, so
/// a higher-priority branch taking over never leaves an orphaned goal
/// behind.
pub struct ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    current: Option<RunningAction<W>>,
    just_finished: Option<(ActionKey, ActionOutcome)>,
    requested: Option<ActionKey>,
}

impl<W> ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    /// Forget last cycle's request marks. Called once per cycle before the
    /// policy pass.
    pub fn begin_tick(&mut self) {
        self.requested = None;
    }

    /// Cancel the current action if no node requested it this cycle.
    pub fn preempt_unrequested(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        let requested = self.requested;
        self.requested = None;

        // An outcome still parked after the policy pass belongs to a node
        // the tree stopped visiting; it must not be collected as fresh when
        // that branch is re-entered later.
        if let Some((key, _)) = self.just_finished {
            if Some(key) != requested {
                self.just_finished = None;
            }
        }

        let Some(current) = self.current.as_ref() else {
            return;
        };

        if Some(current.key) != requested {
            self.cancel_current(ctx, world, blackboard);
        }
    }

    pub fn current_key(&self) -> Option<ActionKey> {
        self.current.as_ref().map(|a| a.key)
    }

    pub fn is_running(&self, key: ActionKey) -> bool {
        self.current_key() == Some(key)
    }

    pub fn cancel_current(&mut self, ctx: &TickContext, world: &mut W, blackboard: &mut Blackboard) {
        if let Some(current) = self.current.as_mut() {
            current.action.cancel(ctx, world, blackboard);
        }
        self.current = None;
        self.just_finished = None;
        self.requested = None;
    }

    pub fn set_current(
        &mut self,
        key: ActionKey,
        action: Box<dyn Action<W>>,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.requested = Some(key);
        if let Some(current) = self.current.as_mut() {
            if current.key != key {
                current.action.cancel(ctx, world, blackboard);
                self.current = None;
            }
        }

        self.just_finished = None;
        if self.current.is_none() {
            self.current = Some(RunningAction { key, action });
        }
    }

    /// Mark `key` requested, constructing and installing the action only if
    /// it is not already current. Dispatch-once semantics live here.
    pub fn ensure_current<F>(
        &mut self,
        key: ActionKey,
        make: F,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) where
        F: FnOnce(&TickContext, &mut W, &mut Blackboard) -> Box<dyn Action<W>>,
    {
        self.requested = Some(key);
        if self.is_running(key) {
            return;
        }

        let action = make(ctx, world, blackboard);
        self.set_current(key, action, ctx, world, blackboard);
    }

    /// Poll the current action once. On a terminal status the action is
    /// dropped and the outcome parked for the owning node to collect.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActionOutcome> {
        let current = self.current.as_mut()?;

        let status = current.action.tick(ctx, world, blackboard);
        let outcome = status.outcome()?;
        let key = current.key;

        self.current = None;
        self.just_finished = Some((key, outcome));
        Some(outcome)
    }

    pub fn take_just_finished(&mut self, key: ActionKey) -> Option<ActionOutcome> {
        match self.just_finished {
            Some((finished_key, outcome)) if finished_key == key => {
                self.just_finished = None;
                Some(outcome)
            }
            _ => None,
        }
    }
}

impl<W> Default for ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            current: None,
            just_finished: None,
            requested: None,
        }
    }
}
