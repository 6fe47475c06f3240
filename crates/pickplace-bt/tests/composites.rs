use std::cell::RefCell;
use std::rc::Rc;

use pickplace_bt::{BtNode, BtStatus, Inverter, Parallel, ParallelPolicy, Selector, Sequence};
use pickplace_core::{ActionRuntime, Blackboard, TickContext, WorldMut, WorldView};

#[derive(Default)]
struct TestWorld {
    ticked: Vec<&'static str>,
}

impl WorldView for TestWorld {}
impl WorldMut for TestWorld {}

type Resets = Rc<RefCell<Vec<&'static str>>>;

/// Leaf that replays a scripted status sequence (last entry repeats) and
/// records ticks into the world and resets into a shared log.
struct ScriptedNode {
    name: &'static str,
    script: Vec<BtStatus>,
    at: usize,
    resets: Resets,
}

fn scripted(
    name: &'static str,
    script: Vec<BtStatus>,
    resets: &Resets,
) -> Box<dyn BtNode<TestWorld>> {
    Box::new(ScriptedNode {
        name,
        script,
        at: 0,
        resets: Rc::clone(resets),
    })
}

impl BtNode<TestWorld> for ScriptedNode {
    fn tick(
        &mut self,
        _ctx: &TickContext,
        world: &mut TestWorld,
        _blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<TestWorld>,
    ) -> BtStatus {
        world.ticked.push(self.name);
        let status = self.script[self.at.min(self.script.len() - 1)];
        self.at += 1;
        status
    }

    fn reset(&mut self) {
        self.at = 0;
        self.resets.borrow_mut().push(self.name);
    }
}

fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        period_seconds: 0.1,
    }
}

#[test]
fn selector_stops_at_first_non_failure() {
    let resets = Resets::default();
    let mut root = Selector::new(vec![
        scripted("a", vec![BtStatus::Failure], &resets),
        scripted("b", vec![BtStatus::Running], &resets),
        scripted("c", vec![BtStatus::Success], &resets),
    ]);

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    let status = root.tick(&ctx(0), &mut world, &mut bb, &mut actions);
    assert_eq!(status, BtStatus::Running);
    assert_eq!(world.ticked, vec!["a", "b"]);
}

#[test]
fn selector_resets_displaced_running_child() {
    let resets = Resets::default();
    let mut root = Selector::new(vec![
        scripted("high", vec![BtStatus::Failure, BtStatus::Running], &resets),
        scripted("low", vec![BtStatus::Running], &resets),
    ]);

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    assert_eq!(
        root.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
    assert!(resets.borrow().is_empty());

    // "high" starts running: the displaced "low" must be reset.
    assert_eq!(
        root.tick(&ctx(1), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
    assert_eq!(*resets.borrow(), vec!["low"]);
    assert_eq!(world.ticked, vec!["high", "low", "high"]);
}

#[test]
fn sequence_resumes_at_running_child() {
    let resets = Resets::default();
    let mut root = Sequence::new(vec![
        scripted("a", vec![BtStatus::Success], &resets),
        scripted("b", vec![BtStatus::Running, BtStatus::Success], &resets),
        scripted("c", vec![BtStatus::Success], &resets),
    ]);

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    assert_eq!(
        root.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
    assert_eq!(world.ticked, vec!["a", "b"]);

    // Second tick resumes at "b" without re-ticking "a".
    assert_eq!(
        root.tick(&ctx(1), &mut world, &mut bb, &mut actions),
        BtStatus::Success
    );
    assert_eq!(world.ticked, vec!["a", "b", "b", "c"]);
}

#[test]
fn sequence_failure_clears_memory() {
    let resets = Resets::default();
    let mut root = Sequence::new(vec![
        scripted("a", vec![BtStatus::Success], &resets),
        scripted("b", vec![BtStatus::Failure], &resets),
    ]);

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    assert_eq!(
        root.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Failure
    );
    assert_eq!(*resets.borrow(), vec!["a", "b"]);

    // Restart from the front after a failure.
    assert_eq!(
        root.tick(&ctx(1), &mut world, &mut bb, &mut actions),
        BtStatus::Failure
    );
    assert_eq!(world.ticked, vec!["a", "b", "a", "b"]);
}

#[test]
fn parallel_require_all_reductions() {
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();
    let resets = Resets::default();

    let mut mixed = Parallel::new(
        ParallelPolicy::RequireAll,
        vec![
            scripted("s", vec![BtStatus::Success], &resets),
            scripted("r", vec![BtStatus::Running], &resets),
        ],
    );
    assert_eq!(
        mixed.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
    assert_eq!(world.ticked, vec!["s", "r"]);

    let mut failing = Parallel::new(
        ParallelPolicy::RequireAll,
        vec![
            scripted("s", vec![BtStatus::Success], &resets),
            scripted("f", vec![BtStatus::Failure], &resets),
        ],
    );
    assert_eq!(
        failing.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Failure
    );

    let mut done = Parallel::new(
        ParallelPolicy::RequireAll,
        vec![
            scripted("s1", vec![BtStatus::Success], &resets),
            scripted("s2", vec![BtStatus::Success], &resets),
        ],
    );
    assert_eq!(
        done.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Success
    );
}

#[test]
fn parallel_ticks_every_child_despite_failure() {
    let resets = Resets::default();
    let mut root = Parallel::new(
        ParallelPolicy::RequireAll,
        vec![
            scripted("f", vec![BtStatus::Failure], &resets),
            scripted("r", vec![BtStatus::Running], &resets),
            scripted("s", vec![BtStatus::Success], &resets),
        ],
    );

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    assert_eq!(
        root.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Failure
    );
    // No short-circuit: all three ran this cycle.
    assert_eq!(world.ticked, vec!["f", "r", "s"]);
}

#[test]
fn parallel_require_one_succeeds_with_one_child() {
    let resets = Resets::default();
    let mut root = Parallel::new(
        ParallelPolicy::RequireOne,
        vec![
            scripted("r", vec![BtStatus::Running], &resets),
            scripted("s", vec![BtStatus::Running, BtStatus::Success], &resets),
        ],
    );

    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    assert_eq!(
        root.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
    assert_eq!(
        root.tick(&ctx(1), &mut world, &mut bb, &mut actions),
        BtStatus::Success
    );
}

#[test]
fn inverter_swaps_terminal_statuses() {
    let resets = Resets::default();
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut actions = ActionRuntime::default();

    let mut inv_success = Inverter::new(scripted("s", vec![BtStatus::Success], &resets));
    assert_eq!(
        inv_success.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Failure
    );

    let mut inv_failure = Inverter::new(scripted("f", vec![BtStatus::Failure], &resets));
    assert_eq!(
        inv_failure.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Success
    );

    let mut inv_running = Inverter::new(scripted("r", vec![BtStatus::Running], &resets));
    assert_eq!(
        inv_running.tick(&ctx(0), &mut world, &mut bb, &mut actions),
        BtStatus::Running
    );
}
