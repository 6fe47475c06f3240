//! Tree assemblies for the scan, grasp, and drop demo.
//!
//! Two variants share the same store keys and action servers:
//!
//! * [`demo_tree`] is the reset-capable pipeline: a reset watch runs in
//!   parallel with a prioritized selector (reset handling first, then the
//!   deliver sequence), and each action is gated on its own operator
//!   trigger.
//! * [`staged_tree`] is the operator-paced variant: one `next`-gated stage
//!   per action, each guarded by its own done marker, folded into a chain.

use pickplace_bt::{
    chain, condition, inverter, parallel, selector, sequence, BtNode, CheckVar, ClearVar,
    ClearingPolicy, GoalClient, Outline, ParallelPolicy, SetVar, Stage, TriggerName, TriggerWorld,
    WaitTrigger,
};
use pickplace_core::{
    ActionKey, ActionName, BbKey, Blackboard, FixedGoal, GoalSource, GoalSourceError, GoalWorld,
};

use crate::config::DemoConfig;

/// `true` while the robot is holding a grasped object.
pub const OBJECT_IN_HAND: BbKey<bool> = BbKey::new(1);
/// Grasp pose produced by the scan, consumed by the grasp goal.
pub const TARGET_GRASP_POSE: BbKey<Vec<f64>> = BbKey::new(2);
/// Raised by the reset watch, consumed and cleared by the reset branch.
pub const DO_RESET: BbKey<bool> = BbKey::new(3);
/// Set once a drop move has delivered the object.
pub const OBJECT_AT_TARGET: BbKey<bool> = BbKey::new(4);
/// Grasp adapter's done flag.
pub const GRASP_DONE: BbKey<bool> = BbKey::new(5);
/// Scan result cached by the staged variant across rounds.
pub const SCAN_RESULT: BbKey<Vec<f64>> = BbKey::new(6);

pub const SCAN_TRIGGER: TriggerName = TriggerName("scan");
pub const GRASP_TRIGGER: TriggerName = TriggerName("grasp");
pub const STOW_TRIGGER: TriggerName = TriggerName("stow");
pub const RESET_TRIGGER: TriggerName = TriggerName("reset");
/// Single progression gate of the staged variant.
pub const NEXT_TRIGGER: TriggerName = TriggerName("next");

pub const SCAN_ACTION: ActionName = ActionName("pointcloud_scan_action");
pub const GRASP_ACTION: ActionName = ActionName("grasp_action");
pub const DROP_ACTION: ActionName = ActionName("drop_move_action");

pub const SCAN_KEY: ActionKey = ActionKey("scan");
pub const GRASP_KEY: ActionKey = ActionKey("grasp");
pub const DROP_KEY: ActionKey = ActionKey("drop_move");

/// Goal for the pointcloud scan action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGoal {
    /// Viewpoints the scan sweeps through before fitting a grasp.
    pub scan_pose_count: u32,
}

/// Goal for the grasp action, generated from a stored pose at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct GraspGoal {
    pub target_pose: Vec<f64>,
}

/// Goal for the drop-move action. The route lives in server-side config, so
/// the goal itself carries nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropMoveGoal;

/// Grasp goal source reading the pose stored under `key`. An absent pose is
/// a generation error, which the adapter turns into Failure without
/// dispatching.
pub fn grasp_goal_from(key: BbKey<Vec<f64>>) -> impl GoalSource<GraspGoal> {
    move |store: &Blackboard| {
        let pose = store
            .get(key)
            .ok_or(GoalSourceError::MissingKey(key.id()))?;
        Ok(GraspGoal {
            target_pose: pose.clone(),
        })
    }
}

/// Assembles the reset-capable demo tree and its printable outline.
///
/// Branch priorities, highest first: reset handling, the workspace stub,
/// then the deliver sequence (ensure held, then stow on request). The root
/// parallel pairs that selector with a reset watch so a reset press is
/// latched into the store even while an action is mid-flight; the selector
/// picks it up on the same cycle and the displaced branch's goal is
/// canceled by the runtime's preemption pass.
pub fn demo_tree<W>(config: &DemoConfig) -> (Box<dyn BtNode<W>>, Outline)
where
    W: GoalWorld + TriggerWorld + 'static,
{
    let reset_watch = sequence(vec![
        Box::new(WaitTrigger::new(RESET_TRIGGER)),
        Box::new(SetVar::new(DO_RESET, true)),
    ]);

    let reset_exec = sequence(vec![
        Box::new(CheckVar::new(DO_RESET, ClearingPolicy::Never).with_expected(true)),
        Box::new(ClearVar::new(DO_RESET)),
        Box::new(ClearVar::new(TARGET_GRASP_POSE)),
        Box::new(SetVar::new(OBJECT_IN_HAND, false)),
    ]);

    // Placeholder for a perception-backed check; the inversion makes it
    // always fall through to the deliver branch.
    let workspace_stub = inverter(condition(|_, _: &W, _| true));

    let scan = sequence(vec![
        Box::new(WaitTrigger::new(SCAN_TRIGGER)),
        Box::new(GoalClient::storing(
            SCAN_KEY,
            SCAN_ACTION,
            FixedGoal(ScanGoal {
                scan_pose_count: config.scan_pose_count,
            }),
            TARGET_GRASP_POSE,
        )),
    ]);

    let ensure_pose = selector(vec![
        Box::new(CheckVar::new(TARGET_GRASP_POSE, ClearingPolicy::Never)),
        scan,
    ]);

    let grasp = sequence(vec![
        ensure_pose,
        Box::new(WaitTrigger::new(GRASP_TRIGGER)),
        Box::new(GoalClient::flagging(
            GRASP_KEY,
            GRASP_ACTION,
            grasp_goal_from(TARGET_GRASP_POSE),
            GRASP_DONE,
        )),
        Box::new(ClearVar::new(TARGET_GRASP_POSE)),
        Box::new(SetVar::new(OBJECT_IN_HAND, true)),
    ]);

    let ensure_held = selector(vec![
        Box::new(CheckVar::new(OBJECT_IN_HAND, ClearingPolicy::Never).with_expected(true)),
        grasp,
    ]);

    let deliver = sequence(vec![
        ensure_held,
        Box::new(WaitTrigger::new(STOW_TRIGGER)),
        Box::new(GoalClient::flagging(
            DROP_KEY,
            DROP_ACTION,
            FixedGoal(DropMoveGoal),
            OBJECT_AT_TARGET,
        )),
        Box::new(SetVar::new(OBJECT_IN_HAND, false)),
    ]);

    let act = selector(vec![reset_exec, workspace_stub, deliver]);

    let root = parallel(ParallelPolicy::RequireOne, vec![reset_watch, act]);

    (root, demo_outline())
}

fn demo_outline() -> Outline {
    use Outline::{Branch, Leaf};

    Branch(
        "pick and place",
        vec![
            Branch(
                "reset watch",
                vec![Leaf("wait reset"), Leaf("flag reset")],
            ),
            Branch(
                "act",
                vec![
                    Branch(
                        "reset",
                        vec![
                            Leaf("reset flagged?"),
                            Leaf("clear reset flag"),
                            Leaf("forget grasp pose"),
                            Leaf("object not in hand"),
                        ],
                    ),
                    Leaf("workspace empty?"),
                    Branch(
                        "deliver",
                        vec![
                            Branch(
                                "ensure held",
                                vec![
                                    Leaf("object in hand?"),
                                    Branch(
                                        "grasp",
                                        vec![
                                            Branch(
                                                "ensure pose",
                                                vec![
                                                    Leaf("grasp pose known?"),
                                                    Branch(
                                                        "scan",
                                                        vec![
                                                            Leaf("wait scan"),
                                                            Leaf("scan scene"),
                                                        ],
                                                    ),
                                                ],
                                            ),
                                            Leaf("wait grasp"),
                                            Leaf("execute grasp"),
                                            Leaf("forget grasp pose"),
                                            Leaf("object in hand"),
                                        ],
                                    ),
                                ],
                            ),
                            Leaf("wait stow"),
                            Leaf("drop object"),
                            Leaf("object not in hand"),
                        ],
                    ),
                ],
            ),
        ],
    )
}

/// Assembles the operator-paced staged tree and its outline.
///
/// Stage guards: the cached scan result survives across rounds (`Never`),
/// while the grasp and drop markers are forgotten on each fresh entry
/// (`OnInitialise`), so a finished chain re-arms for the next object but
/// re-scans only when something clears the cache.
pub fn staged_tree<W>(config: &DemoConfig) -> (Box<dyn BtNode<W>>, Outline)
where
    W: GoalWorld + TriggerWorld + 'static,
{
    let root = chain(vec![
        Stage::new(
            Box::new(CheckVar::new(SCAN_RESULT, ClearingPolicy::Never)),
            vec![
                Box::new(WaitTrigger::new(NEXT_TRIGGER)),
                Box::new(GoalClient::storing(
                    SCAN_KEY,
                    SCAN_ACTION,
                    FixedGoal(ScanGoal {
                        scan_pose_count: config.scan_pose_count,
                    }),
                    SCAN_RESULT,
                )),
            ],
        ),
        Stage::new(
            Box::new(
                CheckVar::new(GRASP_DONE, ClearingPolicy::OnInitialise).with_expected(true),
            ),
            vec![
                Box::new(WaitTrigger::new(NEXT_TRIGGER)),
                Box::new(GoalClient::flagging(
                    GRASP_KEY,
                    GRASP_ACTION,
                    grasp_goal_from(SCAN_RESULT),
                    GRASP_DONE,
                )),
            ],
        ),
        Stage::new(
            Box::new(
                CheckVar::new(OBJECT_AT_TARGET, ClearingPolicy::OnInitialise).with_expected(true),
            ),
            vec![
                Box::new(WaitTrigger::new(NEXT_TRIGGER)),
                Box::new(GoalClient::flagging(
                    DROP_KEY,
                    DROP_ACTION,
                    FixedGoal(DropMoveGoal),
                    OBJECT_AT_TARGET,
                )),
            ],
        ),
    ]);

    (root, staged_outline())
}

fn staged_outline() -> Outline {
    use Outline::{Branch, Leaf};

    Branch(
        "staged pick and place",
        vec![
            Leaf("object at target?"),
            Branch(
                "stow",
                vec![
                    Branch(
                        "grasp gate",
                        vec![
                            Leaf("object grasped?"),
                            Branch(
                                "grasp",
                                vec![
                                    Branch(
                                        "scan gate",
                                        vec![
                                            Leaf("scan cached?"),
                                            Branch(
                                                "scan",
                                                vec![Leaf("wait next"), Leaf("scan scene")],
                                            ),
                                        ],
                                    ),
                                    Leaf("wait next"),
                                    Leaf("execute grasp"),
                                ],
                            ),
                        ],
                    ),
                    Leaf("wait next"),
                    Leaf("drop object"),
                ],
            ),
        ],
    )
}
