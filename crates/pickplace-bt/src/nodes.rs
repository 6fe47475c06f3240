use pickplace_core::{ActionRuntime, Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};

/// Fallback composite. Restarts from the first child every cycle, so an
/// earlier child becoming satisfied preempts whatever was running below it;
/// the displaced running child is reset, which is what lets the runtime
/// cancel its in-flight goal.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn BtNode<W>>>,
    running: Option<usize>,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl<W> BtNode<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        for i in 0..self.children.len() {
            let status = self.children[i].tick(ctx, world, blackboard, actions);
            match status {
                BtStatus::Failure => continue,
                BtStatus::Success => {
                    self.reset();
                    return BtStatus::Success;
                }
                BtStatus::Running => {
                    if self.running != Some(i) {
                        if let Some(prev) = self.running {
                            self.children[prev].reset();
                        }
                        self.running = Some(i);
                    }
                    return BtStatus::Running;
                }
            }
        }

        self.reset();
        BtStatus::Failure
    }

    fn reset(&mut self) {
        self.running = None;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Sequence composite with memory: resumes at the remembered running child
/// instead of re-ticking earlier children. Memory is cleared on Failure and
/// on completion.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn BtNode<W>>>,
    index: usize,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self { children, index: 0 }
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        while self.index < self.children.len() {
            let status = self.children[self.index].tick(ctx, world, blackboard, actions);
            match status {
                BtStatus::Running => return BtStatus::Running,
                BtStatus::Failure => {
                    self.reset();
                    return BtStatus::Failure;
                }
                BtStatus::Success => self.index += 1,
            }
        }

        self.reset();
        BtStatus::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPolicy {
    /// Success only once every child has succeeded this cycle.
    RequireAll,
    /// Success as soon as any child succeeds.
    RequireOne,
}

/// Ticks every child every cycle, no short-circuiting, and reduces the
/// results under an explicit policy. Any child Failure fails the whole node.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    policy: ParallelPolicy,
    children: Vec<Box<dyn BtNode<W>>>,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(policy: ParallelPolicy, children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self { policy, children }
    }
}

impl<W> BtNode<W> for Parallel<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        let mut succeeded = 0usize;
        let mut failed = false;

        for child in self.children.iter_mut() {
            match child.tick(ctx, world, blackboard, actions) {
                BtStatus::Success => succeeded += 1,
                BtStatus::Failure => failed = true,
                BtStatus::Running => {}
            }
        }

        if failed {
            self.reset();
            return BtStatus::Failure;
        }

        let done = match self.policy {
            ParallelPolicy::RequireAll => succeeded == self.children.len(),
            ParallelPolicy::RequireOne => succeeded > 0,
        };

        if done {
            self.reset();
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn reset(&mut self) {
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Decorator that swaps Success and Failure; Running passes through.
pub struct Inverter<W>
where
    W: WorldMut + 'static,
{
    child: Box<dyn BtNode<W>>,
}

impl<W> Inverter<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Box<dyn BtNode<W>>) -> Self {
        Self { child }
    }
}

impl<W> BtNode<W> for Inverter<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        match self.child.tick(ctx, world, blackboard, actions) {
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F, W> BtNode<W> for Condition<F>
where
    F: FnMut(&TickContext, &W, &Blackboard) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if (self.cond)(ctx, &*world, &*blackboard) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    fn reset(&mut self) {}
}
