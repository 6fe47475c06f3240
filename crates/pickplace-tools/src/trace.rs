#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use pickplace_core::{ActionName, BbKey, Blackboard, GoalId};

/// One recorded edge of a goal's lifecycle.
///
/// Events are plain owned data: the tick loop records one per edge
/// (dispatch, terminal status, cancellation) and tooling renders or
/// serializes them later. `action` and `goal` are optional because some
/// edges happen before a transport goal exists, e.g. a payload that could
/// not be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    /// Action server involved, when known.
    pub action: Option<Cow<'static, str>>,
    /// Transport id of the goal involved, once one exists.
    pub goal: Option<u64>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            action: None,
            goal: None,
        }
    }

    /// Event about one in-flight goal on one action server.
    pub fn goal_event(
        tick: u64,
        tag: impl Into<Cow<'static, str>>,
        action: ActionName,
        goal: GoalId,
    ) -> Self {
        Self::new(tick, tag).with_action(action).with_goal(goal)
    }

    pub fn with_action(mut self, action: ActionName) -> Self {
        self.action = Some(Cow::Borrowed(action.0));
        self
    }

    pub fn with_goal(mut self, goal: GoalId) -> Self {
        self.goal = Some(goal.0);
        self
    }
}

/// Streaming consumer for events as they are emitted.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Event log collected on the blackboard while [`TRACE_LOG`] is set.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Number of recorded events carrying `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.tag == tag).count()
    }

    /// Tags recorded for one goal, in record order.
    pub fn goal_history(&self, goal: GoalId) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.goal == Some(goal.0))
            .map(|e| e.tag.as_ref())
            .collect()
    }

    /// Events that involved the named action server.
    pub fn for_action(&self, action: ActionName) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(move |e| e.action.as_deref() == Some(action.0))
    }
}

/// Blackboard key for collecting events in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new(0x0B07_7ACE_0000_0001);
/// Blackboard key for streaming events into a user-provided sink.
pub const TRACE_SINK: BbKey<Box<dyn TraceSink>> = BbKey::new(0x0B07_7ACE_0000_0002);

pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    if let Some(log) = blackboard.get_mut(TRACE_LOG) {
        log.push(event.clone());
    }
    if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
        sink.emit(event);
    }
}
