use std::io::Write as _;

use pickplace_demo::DemoConfig;
use pickplace_motion::ArmSide;

#[test]
fn defaults_describe_a_runnable_demo() {
    let config = DemoConfig::default();

    assert_eq!(config.scan_pose_count, 5);
    assert_eq!(config.tick_period().as_millis(), 100);
    assert_eq!(config.setup_timeout().as_secs(), 15);
    assert_eq!(config.drop.carry_arm, ArmSide::Left);
    assert_eq!(config.drop.scan_arm, ArmSide::Right);
    assert!(!config.drop.drop_waypoints.is_empty());
    assert_eq!(config.drop.carry_home.positions.len(), 7);
    assert_eq!(config.drop.velocity_scaling, 0.5);
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "scan_pose_count: 9").unwrap();
    writeln!(file, "drop:").unwrap();
    writeln!(file, "  velocity_scaling: 0.25").unwrap();
    file.flush().unwrap();

    let config = DemoConfig::load(file.path()).unwrap();

    assert_eq!(config.scan_pose_count, 9);
    assert_eq!(config.drop.velocity_scaling, 0.25);
    assert_eq!(config.tick_period_ms, 100);
    assert_eq!(config.drop.carry_arm, ArmSide::Left);
    assert_eq!(
        config.drop.retract_waypoint.name,
        DemoConfig::default().drop.retract_waypoint.name
    );
}

#[test]
fn full_drop_section_round_trips_into_a_plan() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
drop:
  retract_waypoint: {{ name: back_off, pose: [-1.0, 0.0, 0.0] }}
  drop_waypoints:
    - {{ name: bin, pose: [3.0, 1.0, 0.0] }}
  carry_arm: right
  scan_arm: left
  carry_home: {{ name: h, positions: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] }}
  scan_search: {{ name: s, positions: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] }}
  carry_ready: {{ name: r, positions: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] }}
  velocity_scaling: 0.8
"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = DemoConfig::load(file.path()).unwrap();
    let plan = config.drop.plan();

    assert_eq!(plan.retract.name, "back_off");
    assert_eq!(plan.drop_waypoints.len(), 1);
    assert_eq!(plan.carry_arm, ArmSide::Right);
    assert_eq!(plan.scan_arm, ArmSide::Left);
    assert_eq!(plan.velocity_scaling, 0.8);
}

#[test]
fn missing_file_is_an_error_but_no_path_is_not() {
    let missing = std::path::Path::new("/nonexistent/demo.yaml");
    assert!(DemoConfig::load(missing).is_err());

    let config = DemoConfig::load_or_default(None).unwrap();
    assert_eq!(config.scan_pose_count, 5);
}
