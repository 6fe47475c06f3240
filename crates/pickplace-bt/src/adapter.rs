use pickplace_core::{
    Action, ActionKey, ActionName, ActionOutcome, ActionRuntime, ActionStatus, BbKey, Blackboard,
    GoalId, GoalPayload, GoalSource, GoalSourceError, GoalStatus, GoalWorld, TickContext,
};
use pickplace_tools::{emit as trace_emit, TraceEvent};

use crate::bt::{BtNode, BtStatus};

/// Where a finished goal's result lands in the store. The two forms are
/// mutually exclusive by construction.
#[derive(Debug)]
pub enum ResultSink<R>
where
    R: 'static,
{
    /// Store the full result payload under this key.
    StoreResult(BbKey<R>),
    /// Discard the payload and set this flag instead.
    SetFlag(BbKey<bool>),
}

impl<R: 'static> Copy for ResultSink<R> {}

impl<R: 'static> Clone for ResultSink<R> {
    fn clone(&self) -> Self {
        *self
    }
}

/// Bridges one tree leaf to an asynchronous external action.
///
/// While its branch is ticked, the node keeps exactly one goal in flight via
/// the single-slot runtime: the first tick while idle generates a payload
/// from the store and dispatches it; subsequent ticks re-request the key and
/// poll. If the tree stops ticking this node while the goal is still in
/// flight, the runtime's preemption pass cancels it on the transport, so a
/// branch switch never leaves an orphaned robot motion behind.
///
/// A payload that cannot be generated (missing store key) is Failure for
/// that tick, without dispatch; the enclosing Selector is expected to route
/// to a fallback branch.
pub struct GoalClient<G, R>
where
    G: Send + 'static,
    R: 'static,
{
    key: ActionKey,
    action: ActionName,
    source: Box<dyn GoalSource<G>>,
    sink: ResultSink<R>,
}

impl<G, R> GoalClient<G, R>
where
    G: Send + 'static,
    R: 'static,
{
    pub fn new(
        key: ActionKey,
        action: ActionName,
        source: impl GoalSource<G>,
        sink: ResultSink<R>,
    ) -> Self {
        Self {
            key,
            action,
            source: Box::new(source),
            sink,
        }
    }

    /// Adapter that stores the full result payload under `result`.
    pub fn storing(
        key: ActionKey,
        action: ActionName,
        source: impl GoalSource<G>,
        result: BbKey<R>,
    ) -> Self {
        Self::new(key, action, source, ResultSink::StoreResult(result))
    }
}

impl<G> GoalClient<G, ()>
where
    G: Send + 'static,
{
    /// Adapter that records only a boolean "done" flag on success.
    pub fn flagging(
        key: ActionKey,
        action: ActionName,
        source: impl GoalSource<G>,
        flag: BbKey<bool>,
    ) -> Self {
        Self::new(key, action, source, ResultSink::SetFlag(flag))
    }
}

impl<G, R, W> BtNode<W> for GoalClient<G, R>
where
    G: Send + 'static,
    R: 'static,
    W: GoalWorld + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if let Some(outcome) = actions.take_just_finished(self.key) {
            return match outcome {
                ActionOutcome::Success => BtStatus::Success,
                ActionOutcome::Failure => BtStatus::Failure,
            };
        }

        if actions.is_running(self.key) {
            actions.ensure_current(
                self.key,
                |_ctx, _world, _bb| unreachable!("unexpected goal restart"),
                ctx,
                world,
                blackboard,
            );
            return BtStatus::Running;
        }

        // Idle: the payload is generated from the store at dispatch time.
        let goal = match self.source.goal(blackboard) {
            Ok(goal) => goal,
            Err(GoalSourceError::MissingKey(_)) => {
                trace_emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "goal.missing_key").with_action(self.action),
                );
                return BtStatus::Failure;
            }
        };

        let action = self.action;
        let sink = self.sink;
        actions.ensure_current(
            self.key,
            move |_ctx, _world, _bb| Box::new(GoalAction::new(action, Box::new(goal), sink)),
            ctx,
            world,
            blackboard,
        );

        BtStatus::Running
    }

    fn reset(&mut self) {}
}

/// The runtime half of the adapter: owns one transport goal from dispatch to
/// terminal status. Dropped by the runtime as soon as it reports a terminal
/// outcome; canceled on the transport when preempted.
pub struct GoalAction<R>
where
    R: 'static,
{
    action: ActionName,
    payload: Option<GoalPayload>,
    goal_id: Option<GoalId>,
    sink: ResultSink<R>,
}

impl<R> GoalAction<R>
where
    R: 'static,
{
    pub fn new(action: ActionName, payload: GoalPayload, sink: ResultSink<R>) -> Self {
        Self {
            action,
            payload: Some(payload),
            goal_id: None,
            sink,
        }
    }
}

impl<R, W> Action<W> for GoalAction<R>
where
    R: 'static,
    W: GoalWorld + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if let Some(payload) = self.payload.take() {
            let id = world.send_goal(self.action, payload);
            trace_emit(
                blackboard,
                TraceEvent::goal_event(ctx.tick, "goal.dispatch", self.action, id),
            );
            self.goal_id = Some(id);
        }

        let Some(id) = self.goal_id else {
            return ActionStatus::Failure;
        };

        match world.goal_status(id) {
            GoalStatus::Pending | GoalStatus::Active => ActionStatus::Running,
            GoalStatus::Succeeded => {
                let stored = match self.sink {
                    ResultSink::StoreResult(key) => match world.take_result(id) {
                        Some(result) => match result.downcast::<R>() {
                            Ok(result) => {
                                blackboard.set(key, *result);
                                true
                            }
                            Err(_) => {
                                panic!("goal result type mismatch for action {}", self.action.0)
                            }
                        },
                        None => false,
                    },
                    ResultSink::SetFlag(key) => {
                        blackboard.set(key, true);
                        true
                    }
                };

                if stored {
                    trace_emit(
                        blackboard,
                        TraceEvent::goal_event(ctx.tick, "goal.succeeded", self.action, id),
                    );
                    ActionStatus::Success
                } else {
                    trace_emit(
                        blackboard,
                        TraceEvent::goal_event(ctx.tick, "goal.result_lost", self.action, id),
                    );
                    ActionStatus::Failure
                }
            }
            GoalStatus::Aborted | GoalStatus::Rejected | GoalStatus::Preempted => {
                trace_emit(
                    blackboard,
                    TraceEvent::goal_event(ctx.tick, "goal.failed", self.action, id),
                );
                ActionStatus::Failure
            }
        }
    }

    fn cancel(&mut self, ctx: &TickContext, world: &mut W, blackboard: &mut Blackboard) {
        if let Some(id) = self.goal_id {
            world.cancel_goal(id);
            trace_emit(
                blackboard,
                TraceEvent::goal_event(ctx.tick, "goal.cancel", self.action, id),
            );
        }
    }
}
