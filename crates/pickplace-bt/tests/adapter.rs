use std::collections::BTreeMap;

use pickplace_bt::{selector, sequence, BtPolicy, GoalClient, SetVar};
use pickplace_core::{
    ActionKey, ActionName, BbKey, Blackboard, FixedGoal, GoalId, GoalPayload, GoalSourceError,
    GoalStatus, GoalWorld, Runner, TickContext, WorldMut, WorldView,
};

const SCAN_RESULT: BbKey<GraspPose> = BbKey::new(1);
const SAW_SUCCESS: BbKey<bool> = BbKey::new(2);
const FELL_BACK: BbKey<bool> = BbKey::new(3);
const TARGET_GRASP_POSE: BbKey<GraspPose> = BbKey::new(4);
const OBJECT_DROPPED: BbKey<bool> = BbKey::new(5);

#[derive(Debug, Clone, PartialEq)]
struct ScanGoal {
    scan_poses: u32,
}

#[derive(Debug, Clone, PartialEq)]
struct GraspPose(Vec<f64>);

#[derive(Default)]
struct FakeTransport {
    next_id: u64,
    sent: Vec<(&'static str, GoalId)>,
    payloads: BTreeMap<u64, GoalPayload>,
    status: BTreeMap<u64, GoalStatus>,
    results: BTreeMap<u64, GoalPayload>,
    canceled: Vec<GoalId>,
}

impl WorldView for FakeTransport {}
impl WorldMut for FakeTransport {}

impl GoalWorld for FakeTransport {
    fn send_goal(&mut self, action: ActionName, goal: GoalPayload) -> GoalId {
        self.next_id += 1;
        let id = GoalId(self.next_id);
        self.sent.push((action.0, id));
        self.payloads.insert(id.0, goal);
        self.status.insert(id.0, GoalStatus::Active);
        id
    }

    fn goal_status(&self, goal: GoalId) -> GoalStatus {
        self.status
            .get(&goal.0)
            .copied()
            .unwrap_or(GoalStatus::Rejected)
    }

    fn take_result(&mut self, goal: GoalId) -> Option<GoalPayload> {
        self.results.remove(&goal.0)
    }

    fn cancel_goal(&mut self, goal: GoalId) {
        self.canceled.push(goal);
        self.status.insert(goal.0, GoalStatus::Preempted);
    }
}

impl FakeTransport {
    fn succeed(&mut self, id: GoalId, result: impl std::any::Any + Send) {
        self.status.insert(id.0, GoalStatus::Succeeded);
        self.results.insert(id.0, Box::new(result));
    }

    fn finish(&mut self, id: GoalId, status: GoalStatus) {
        self.status.insert(id.0, status);
    }
}

fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        period_seconds: 0.1,
    }
}

#[test]
fn dispatches_once_and_stores_result_once() {
    let client = GoalClient::storing(
        ActionKey("scan"),
        ActionName("pointcloud_scan"),
        FixedGoal(ScanGoal { scan_poses: 5 }),
        SCAN_RESULT,
    );
    let root = sequence(vec![Box::new(client), Box::new(SetVar::new(SAW_SUCCESS, true))]);
    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    let mut world = FakeTransport::default();

    runner.tick(&ctx(0), &mut world);
    assert_eq!(world.sent.len(), 1);
    assert_eq!(world.sent[0].0, "pointcloud_scan");
    let sent_goal = world.payloads[&1].downcast_ref::<ScanGoal>();
    assert_eq!(sent_goal, Some(&ScanGoal { scan_poses: 5 }));

    // Repeated ticks while the goal is active never re-dispatch.
    for tick in 1..4 {
        runner.tick(&ctx(tick), &mut world);
    }
    assert_eq!(world.sent.len(), 1);
    assert!(!runner.blackboard.contains(SCAN_RESULT));

    world.succeed(GoalId(1), GraspPose(vec![0.4, 0.0, 0.2]));
    runner.tick(&ctx(4), &mut world); // runtime observes the terminal status
    runner.tick(&ctx(5), &mut world); // node collects the outcome

    assert_eq!(
        runner.blackboard.get(SCAN_RESULT),
        Some(&GraspPose(vec![0.4, 0.0, 0.2]))
    );
    assert_eq!(runner.blackboard.get(SAW_SUCCESS).copied(), Some(true));
    assert_eq!(world.sent.len(), 1);
}

#[test]
fn missing_store_key_fails_that_tick_without_dispatch() {
    let client = GoalClient::flagging(
        ActionKey("grasp"),
        ActionName("grasp_action"),
        |bb: &Blackboard| {
            bb.get(TARGET_GRASP_POSE)
                .cloned()
                .ok_or(GoalSourceError::MissingKey(TARGET_GRASP_POSE.id()))
        },
        SAW_SUCCESS,
    );
    let root = selector(vec![Box::new(client), Box::new(SetVar::new(FELL_BACK, true))]);
    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    let mut world = FakeTransport::default();

    // No pose yet: the adapter fails for the tick and the fallback runs.
    runner.tick(&ctx(0), &mut world);
    assert!(world.sent.is_empty());
    assert_eq!(runner.blackboard.get(FELL_BACK).copied(), Some(true));

    // Once the pose appears a later tick dispatches normally.
    runner
        .blackboard
        .set(TARGET_GRASP_POSE, GraspPose(vec![0.1, 0.2, 0.3]));
    runner.tick(&ctx(1), &mut world);
    assert_eq!(world.sent.len(), 1);
    let sent_goal = world.payloads[&1].downcast_ref::<GraspPose>();
    assert_eq!(sent_goal, Some(&GraspPose(vec![0.1, 0.2, 0.3])));
}

#[test]
fn aborted_goal_fails_without_writing_result() {
    let client = GoalClient::storing(
        ActionKey("scan"),
        ActionName("pointcloud_scan"),
        FixedGoal(ScanGoal { scan_poses: 5 }),
        SCAN_RESULT,
    );
    let root = selector(vec![Box::new(client), Box::new(SetVar::new(FELL_BACK, true))]);
    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    let mut world = FakeTransport::default();

    runner.tick(&ctx(0), &mut world);
    world.finish(GoalId(1), GoalStatus::Aborted);
    runner.tick(&ctx(1), &mut world);
    runner.tick(&ctx(2), &mut world);

    assert!(!runner.blackboard.contains(SCAN_RESULT));
    assert_eq!(runner.blackboard.get(FELL_BACK).copied(), Some(true));
}

#[test]
fn externally_preempted_goal_reports_failure() {
    let client = GoalClient::flagging(
        ActionKey("drop"),
        ActionName("drop_action"),
        FixedGoal(()),
        OBJECT_DROPPED,
    );
    let root = selector(vec![Box::new(client), Box::new(SetVar::new(FELL_BACK, true))]);
    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    let mut world = FakeTransport::default();

    runner.tick(&ctx(0), &mut world);
    world.finish(GoalId(1), GoalStatus::Preempted);
    runner.tick(&ctx(1), &mut world);
    runner.tick(&ctx(2), &mut world);

    assert!(!runner.blackboard.contains(OBJECT_DROPPED));
    assert_eq!(runner.blackboard.get(FELL_BACK).copied(), Some(true));
}

#[test]
fn flag_sink_sets_flag_and_ignores_payload() {
    let client = GoalClient::flagging(
        ActionKey("drop"),
        ActionName("drop_action"),
        FixedGoal(()),
        OBJECT_DROPPED,
    );
    let root = sequence(vec![Box::new(client), Box::new(SetVar::new(SAW_SUCCESS, true))]);
    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    let mut world = FakeTransport::default();

    runner.tick(&ctx(0), &mut world);
    world.succeed(GoalId(1), "unread payload");
    runner.tick(&ctx(1), &mut world);
    runner.tick(&ctx(2), &mut world);

    assert_eq!(runner.blackboard.get(OBJECT_DROPPED).copied(), Some(true));
    assert_eq!(runner.blackboard.get(SAW_SUCCESS).copied(), Some(true));
    // The payload stays with the transport; nothing consumed it.
    assert!(world.results.contains_key(&1));
}
