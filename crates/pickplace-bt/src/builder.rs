use std::fmt;

use pickplace_core::{Blackboard, TickContext, WorldMut};

use crate::bt::BtNode;
use crate::nodes::{Condition, Inverter, Parallel, ParallelPolicy, Selector, Sequence};

pub fn selector<W>(children: Vec<Box<dyn BtNode<W>>>) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Selector::new(children))
}

pub fn sequence<W>(children: Vec<Box<dyn BtNode<W>>>) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Sequence::new(children))
}

pub fn parallel<W>(policy: ParallelPolicy, children: Vec<Box<dyn BtNode<W>>>) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Parallel::new(policy, children))
}

pub fn inverter<W>(child: Box<dyn BtNode<W>>) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Inverter::new(child))
}

pub fn condition<W, F>(cond: F) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
    F: FnMut(&TickContext, &W, &Blackboard) -> bool + 'static,
{
    Box::new(Condition::new(cond))
}

/// One guarded stage of a task chain: skip the work when `done` already
/// holds, otherwise finish every earlier stage first, then run `steps` in
/// order.
pub struct Stage<W>
where
    W: WorldMut + 'static,
{
    pub done: Box<dyn BtNode<W>>,
    pub steps: Vec<Box<dyn BtNode<W>>>,
}

impl<W> Stage<W>
where
    W: WorldMut + 'static,
{
    pub fn new(done: Box<dyn BtNode<W>>, steps: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self { done, steps }
    }
}

/// Folds an ordered stage list into the nested priority shape
/// `Selector[done, Sequence[previous stages.., steps..]]`, so later stages
/// implicitly require everything before them and each tick re-checks the
/// `done` guards from the top.
pub fn chain<W>(stages: Vec<Stage<W>>) -> Box<dyn BtNode<W>>
where
    W: WorldMut + 'static,
{
    let mut root: Option<Box<dyn BtNode<W>>> = None;

    for stage in stages {
        let mut steps = Vec::with_capacity(stage.steps.len() + 1);
        if let Some(prev) = root.take() {
            steps.push(prev);
        }
        steps.extend(stage.steps);
        root = Some(selector(vec![stage.done, sequence(steps)]));
    }

    root.unwrap_or_else(|| condition(|_, _: &W, _| true))
}

/// Text skeleton of an assembled tree, rendered at startup so an operator
/// can eyeball the branch priorities. Kept separate from the nodes
/// themselves; labels carry no behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outline {
    Leaf(&'static str),
    Branch(&'static str, Vec<Outline>),
}

impl Outline {
    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("    ")?;
        }
        match self {
            Outline::Leaf(name) => writeln!(f, "--> {name}"),
            Outline::Branch(name, children) => {
                writeln!(f, "[-] {name}")?;
                for child in children {
                    child.fmt_at(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}
