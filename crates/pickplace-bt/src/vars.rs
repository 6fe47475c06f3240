use pickplace_core::{ActionRuntime, BbKey, Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};

/// What a `CheckVar` does to its guarded key when its branch is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearingPolicy {
    /// Leave the key alone; clearing happens elsewhere (`ClearVar`).
    Never,
    /// Erase the key on each fresh entry (first tick after a reset), so a
    /// re-attempted branch forgets the previous run's cached answer.
    OnInitialise,
}

/// Condition over one store key: Success iff the key is present and, when an
/// expected value is configured, the stored value equals it. Never Running.
pub struct CheckVar<T>
where
    T: PartialEq + 'static,
{
    key: BbKey<T>,
    expected: Option<T>,
    clearing: ClearingPolicy,
    entered: bool,
}

impl<T> CheckVar<T>
where
    T: PartialEq + 'static,
{
    pub fn new(key: BbKey<T>, clearing: ClearingPolicy) -> Self {
        Self {
            key,
            expected: None,
            clearing,
            entered: false,
        }
    }

    pub fn with_expected(mut self, expected: T) -> Self {
        self.expected = Some(expected);
        self
    }
}

impl<T, W> BtNode<W> for CheckVar<T>
where
    T: PartialEq + 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _world: &mut W,
        blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if !self.entered {
            self.entered = true;
            if self.clearing == ClearingPolicy::OnInitialise {
                let _ = blackboard.remove(self.key);
            }
        }

        let ok = match (blackboard.get(self.key), self.expected.as_ref()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(value), Some(expected)) => value == expected,
        };

        if ok {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    fn reset(&mut self) {
        self.entered = false;
    }
}

/// Writes a fixed value under a key; always Success.
pub struct SetVar<T>
where
    T: Clone + 'static,
{
    key: BbKey<T>,
    value: T,
}

impl<T> SetVar<T>
where
    T: Clone + 'static,
{
    pub fn new(key: BbKey<T>, value: T) -> Self {
        Self { key, value }
    }
}

impl<T, W> BtNode<W> for SetVar<T>
where
    T: Clone + 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _world: &mut W,
        blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        blackboard.set(self.key, self.value.clone());
        BtStatus::Success
    }

    fn reset(&mut self) {}
}

/// Removes a key from the store; always Success, present or not.
pub struct ClearVar<T>
where
    T: 'static,
{
    key: BbKey<T>,
}

impl<T> ClearVar<T>
where
    T: 'static,
{
    pub fn new(key: BbKey<T>) -> Self {
        Self { key }
    }
}

impl<T, W> BtNode<W> for ClearVar<T>
where
    T: 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _world: &mut W,
        blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        let _ = blackboard.remove(self.key);
        BtStatus::Success
    }

    fn reset(&mut self) {}
}
