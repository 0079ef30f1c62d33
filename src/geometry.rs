use crate::models::{CanonicalQuad, Point2D, Quadrilateral};

/// Straight-line distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Put four corners into top-left, top-right, bottom-right, bottom-left order.
///
/// With `s = x + y` and `d = y - x`: the smallest `s` is the top-left corner,
/// the largest `s` the bottom-right, the smallest `d` the top-right and the
/// largest `d` the bottom-left. Ties go to the point that comes first in the
/// input. Non-convex or duplicated input never panics, but may put the same
/// point in two slots; the rectifier rejects such quads as degenerate.
pub fn order_canonical(quad: &Quadrilateral) -> CanonicalQuad {
    let sums = quad.points.map(|p| p.x + p.y);
    let diffs = quad.points.map(|p| p.y - p.x);

    CanonicalQuad {
        top_left: quad.points[first_extreme(&sums, |a, b| a < b)],
        top_right: quad.points[first_extreme(&diffs, |a, b| a < b)],
        bottom_right: quad.points[first_extreme(&sums, |a, b| a > b)],
        bottom_left: quad.points[first_extreme(&diffs, |a, b| a > b)],
    }
}

/// Index of the first value that no later value strictly beats.
fn first_extreme(values: &[f64; 4], beats: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if beats(v, values[best]) {
            best = i;
        }
    }
    best
}

/// Unsigned area of a closed polygon (shoelace formula).
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    twice_area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0);
        assert_eq!(distance(p(-1.0, -1.0), p(-1.0, -1.0)), 0.0);
    }

    #[test]
    fn first_extreme_prefers_earliest_on_tie() {
        assert_eq!(first_extreme(&[1.0, 0.0, 0.0, 2.0], |a, b| a < b), 1);
        assert_eq!(first_extreme(&[2.0, 0.0, 2.0, 1.0], |a, b| a > b), 0);
    }

    #[test]
    fn polygon_area_of_rectangle() {
        let rect = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 5.0), p(0.0, 5.0)];
        assert!((polygon_area(&rect) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_area_ignores_winding() {
        let cw = [p(0.0, 0.0), p(0.0, 5.0), p(10.0, 5.0), p(10.0, 0.0)];
        assert!((polygon_area(&cw) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_area_of_collinear_points_is_zero() {
        let line = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)];
        assert_eq!(polygon_area(&line), 0.0);
        assert_eq!(polygon_area(&[p(0.0, 0.0), p(1.0, 1.0)]), 0.0);
    }
}
