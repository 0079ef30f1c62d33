mod common;

use common::*;
use docscan::geometry::{distance, order_canonical};

#[test]
fn square_in_any_order_becomes_canonical() {
    let corners = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
    for input in permutations(corners) {
        let ordered = order_canonical(&Quadrilateral::new(input));
        assert_eq!(ordered.to_array(), corners, "input {:?}", input);
    }
}

#[test]
fn perspective_quad_in_any_order_becomes_canonical() {
    let corners = PHOTO_CORNERS.map(Point2D::from);
    for input in permutations(corners) {
        let ordered = order_canonical(&Quadrilateral::new(input));
        assert_eq!(ordered.to_array(), corners);
    }
}

#[test]
fn ordering_is_idempotent() {
    let quads = [
        [p(3.0, 4.0), p(97.0, 12.0), p(90.0, 70.0), p(8.0, 66.0)],
        [p(90.0, 70.0), p(3.0, 4.0), p(8.0, 66.0), p(97.0, 12.0)],
        [p(120.5, 33.25), p(511.0, 80.0), p(480.75, 402.0), p(101.0, 390.5)],
        [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
    ];
    for points in quads {
        let once = order_canonical(&Quadrilateral::new(points));
        let twice = order_canonical(&Quadrilateral::from(once));
        assert_eq!(once, twice);
    }
}

#[test]
fn canonical_input_is_a_fixed_point() {
    let canonical = [p(5.0, 5.0), p(50.0, 8.0), p(47.0, 40.0), p(2.0, 44.0)];
    let ordered = order_canonical(&Quadrilateral::new(canonical));
    assert_eq!(ordered.to_array(), canonical);
}

/// A square rotated by 45 degrees ties on both the sum and the difference.
/// Ties resolve to whichever tied point comes first in the input.
#[test]
fn ties_resolve_to_first_in_input_order() {
    let diamond = [p(10.0, 0.0), p(20.0, 10.0), p(10.0, 20.0), p(0.0, 10.0)];
    let ordered = order_canonical(&Quadrilateral::new(diamond));
    assert_eq!(ordered.top_left, p(10.0, 0.0));
    assert_eq!(ordered.bottom_right, p(20.0, 10.0));
    assert_eq!(ordered.top_right, p(10.0, 0.0));
    assert_eq!(ordered.bottom_left, p(10.0, 20.0));

    // Reversing the input changes which tied point wins, but stays deterministic.
    let mut reversed = diamond;
    reversed.reverse();
    let a = order_canonical(&Quadrilateral::new(reversed));
    let b = order_canonical(&Quadrilateral::new(reversed));
    assert_eq!(a, b);
    assert_eq!(a.top_left, p(0.0, 10.0));
}

#[test]
fn ties_never_invent_points() {
    let inputs = [
        [p(10.0, 0.0), p(20.0, 10.0), p(10.0, 20.0), p(0.0, 10.0)],
        [p(1.0, 1.0), p(1.0, 1.0), p(1.0, 1.0), p(1.0, 1.0)],
        [p(0.0, 0.0), p(5.0, 5.0), p(5.0, 5.0), p(9.0, 2.0)],
    ];
    for input in inputs {
        for permuted in permutations(input) {
            let ordered = order_canonical(&Quadrilateral::new(permuted));
            for corner in ordered.to_array() {
                assert!(permuted.contains(&corner));
            }
        }
    }
}

#[test]
fn distance_matches_pythagoras() {
    assert_eq!(distance(p(1.0, 1.0), p(4.0, 5.0)), 5.0);
    assert_eq!(distance(p(4.0, 5.0), p(1.0, 1.0)), 5.0);
}
