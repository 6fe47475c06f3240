#![cfg(feature = "serde")]

use pickplace_motion::{ArmSide, JointTarget, Waypoint};

#[test]
fn waypoint_roundtrips_via_serde() {
    let waypoint = Waypoint::new("drop_zone", vec![2.0, 1.0, 1.57]);

    let json = serde_json::to_string(&waypoint).expect("serialize waypoint");
    let back: Waypoint = serde_json::from_str(&json).expect("deserialize waypoint");

    assert_eq!(back, waypoint);
}

#[test]
fn joint_target_reads_the_config_shape() {
    let json = r#"{"name": "home_l", "positions": [0.0, -2.26, 2.35, 0.52, 0.0, 0.7, 0.0]}"#;

    let target: JointTarget = serde_json::from_str(json).expect("deserialize joint target");

    assert_eq!(target.name, "home_l");
    assert_eq!(target.positions.len(), 7);
}

#[test]
fn arm_side_encodes_lowercase() {
    assert_eq!(serde_json::to_string(&ArmSide::Left).unwrap(), "\"left\"");

    let side: ArmSide = serde_json::from_str("\"right\"").expect("deserialize arm side");
    assert_eq!(side, ArmSide::Right);
}
