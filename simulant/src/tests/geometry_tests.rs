use crate::geometry::{
    clamp_scroll, scroll_deficit, AxisValues, BoundaryValues, LeftTopValues, RightBottomValues,
};
use serde_json::json;

#[test]
fn create_is_shape_invariant() {
    let direct = AxisValues::create((3.0, 4.0));
    let left_top = AxisValues::create(LeftTopValues { left: 3.0, top: 4.0 });
    let right_bottom = AxisValues::create(RightBottomValues { right: 3.0, bottom: 4.0 });

    assert_eq!(direct, left_top);
    assert_eq!(direct, right_bottom);
    assert_eq!(direct, AxisValues::new(3.0, 4.0));
}

#[test]
fn add_then_sub_is_identity() {
    let start = AxisValues::new(10.5, -2.25);
    let operand = AxisValues::new(3.75, 8.0);
    assert_eq!(start.add(operand).sub(operand), start);
}

#[test]
fn combinators_chain_fluently() {
    let result = AxisValues::new(1, 1)
        .add(AxisValues::new(2, 3))
        .add(AxisValues::new(4, 5))
        .sub(AxisValues::new(1, 1));
    assert_eq!(result, AxisValues::new(6, 8));
}

#[test]
fn std_operators_mirror_combinators() {
    let a = AxisValues::new(5.0, 6.0);
    let b = AxisValues::new(1.0, 2.0);
    assert_eq!(a + b, a.add(b));
    assert_eq!(a - b, a.sub(b));
}

#[test]
fn from_json_prefers_left_top_over_other_shapes() {
    let value = json!({ "left": 1.0, "top": 2.0, "right": 5.0, "bottom": 6.0, "x": 9.0, "y": 9.0 });
    assert_eq!(AxisValues::from_json(&value), Some(AxisValues::new(1.0, 2.0)));
}

#[test]
fn from_json_prefers_right_bottom_over_x_y() {
    let value = json!({ "right": 5.0, "bottom": 6.0, "x": 9.0, "y": 9.0 });
    assert_eq!(AxisValues::from_json(&value), Some(AxisValues::new(5.0, 6.0)));
}

#[test]
fn from_json_falls_back_to_x_y() {
    let value = json!({ "x": 7.5, "y": 8.5 });
    assert_eq!(AxisValues::from_json(&value), Some(AxisValues::new(7.5, 8.5)));
}

#[test]
fn from_json_rejects_malformed_payloads() {
    assert_eq!(AxisValues::from_json(&json!({})), None);
    assert_eq!(AxisValues::from_json(&json!({ "left": 1.0 })), None);
    assert_eq!(AxisValues::from_json(&json!({ "x": "7", "y": 8.0 })), None);
    assert_eq!(AxisValues::from_json(&json!(null)), None);
}

#[test]
fn axis_values_round_trip_through_json() {
    let point = AxisValues::new(12.0, -3.5);
    let encoded = serde_json::to_string(&point).unwrap();
    let decoded: AxisValues<f64> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, point);
}

#[test]
fn boundary_values_measure_their_box() {
    let rect = BoundaryValues::new(10.0, 20.0, 110.0, 70.0);
    assert_eq!(rect.width(), 100.0);
    assert_eq!(rect.height(), 50.0);
    assert_eq!(rect.position(), AxisValues::new(10.0, 20.0));
    assert_eq!(rect.center(), AxisValues::new(60.0, 45.0));
    assert!(rect.contains(&AxisValues::new(10.0, 70.0)));
    assert!(!rect.contains(&AxisValues::new(9.9, 45.0)));
}

#[test]
fn scroll_deficit_is_zero_inside_the_view() {
    let view = BoundaryValues::new(0.0, 0.0, 300.0, 200.0);
    assert_eq!(
        scroll_deficit(&AxisValues::new(150.0, 100.0), &view),
        AxisValues::new(0.0, 0.0)
    );
    // Edges count as visible.
    assert_eq!(
        scroll_deficit(&AxisValues::new(300.0, 200.0), &view),
        AxisValues::new(0.0, 0.0)
    );
}

#[test]
fn scroll_deficit_targets_the_nearest_edge() {
    let view = BoundaryValues::new(100.0, 100.0, 400.0, 300.0);
    // Below and to the right: positive deltas past the far edges.
    assert_eq!(
        scroll_deficit(&AxisValues::new(450.0, 525.0), &view),
        AxisValues::new(50.0, 225.0)
    );
    // Above and to the left: negative deltas to the near edges.
    assert_eq!(
        scroll_deficit(&AxisValues::new(40.0, 10.0), &view),
        AxisValues::new(-60.0, -90.0)
    );
}

#[test]
fn clamp_scroll_stays_in_range() {
    let max = AxisValues::new(600.0, 400.0);
    assert_eq!(
        clamp_scroll(AxisValues::new(-10.0, 1000.0), max),
        AxisValues::new(0.0, 400.0)
    );
    assert_eq!(
        clamp_scroll(AxisValues::new(300.0, 200.0), max),
        AxisValues::new(300.0, 200.0)
    );
    // A container without overflow clamps everything to zero, even on
    // degenerate layouts reporting a negative range.
    assert_eq!(
        clamp_scroll(AxisValues::new(50.0, 50.0), AxisValues::new(0.0, -3.0)),
        AxisValues::new(0.0, 0.0)
    );
}
