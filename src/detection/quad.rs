use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use tracing::{debug, trace};

use crate::error::{Result, ScanError};
use crate::geometry::distance;
use crate::models::{Contour, Point2D, Quadrilateral};

/// Picks the document outline out of a set of contours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrilateralFinder {
    /// Only this many of the largest contours are considered.
    pub max_candidates: usize,
    /// Approximation tolerance as a fraction of each contour's perimeter.
    pub epsilon_fraction: f64,
}

impl Default for QuadrilateralFinder {
    fn default() -> Self {
        Self {
            max_candidates: 5,
            epsilon_fraction: 0.02,
        }
    }
}

impl QuadrilateralFinder {
    pub fn new(max_candidates: usize, epsilon_fraction: f64) -> Self {
        Self {
            max_candidates,
            epsilon_fraction,
        }
    }

    /// Return the largest contour that simplifies to exactly four vertices.
    ///
    /// Contours are ranked by enclosed area, largest first, and only the top
    /// `max_candidates` are tried. Fails with [`ScanError::NotFound`] rather
    /// than guessing when none of them is a quadrilateral.
    pub fn find(&self, contours: &[Contour]) -> Result<Quadrilateral> {
        let mut ranked: Vec<(f64, &Contour)> = contours.iter().map(|c| (c.area(), c)).collect();
        // Stable, so equal areas keep input order.
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(self.max_candidates);

        let examined = ranked.len();
        ranked
            .into_iter()
            .enumerate()
            .find_map(|(rank, (area, contour))| {
                let polygon = self.approximate(contour);
                trace!(rank, area, vertices = polygon.len(), "candidate contour");
                <[Point2D; 4]>::try_from(polygon).ok().map(|points| {
                    debug!(rank, area, "four-vertex contour selected");
                    Quadrilateral::new(points)
                })
            })
            .ok_or(ScanError::NotFound { examined })
    }

    /// Simplify a closed contour with a tolerance proportional to its perimeter.
    pub fn approximate(&self, contour: &Contour) -> Vec<Point2D> {
        if contour.len() < 3 {
            return contour.points.clone();
        }
        let epsilon = self.epsilon_fraction * contour.perimeter();
        if !(epsilon > 0.0) {
            return contour.points.clone();
        }
        approximate_closed(&contour.points, epsilon)
    }
}

/// Douglas-Peucker over a closed curve.
///
/// The curve is cut at the two ends of an approximate diameter and each half
/// is simplified as an open polyline. Both cut points are extreme points of
/// the curve and are always kept as vertices; where tracing happened to start
/// carries no weight.
fn approximate_closed(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let (anchor, opposite) = diameter_ends(points);
    if anchor == opposite {
        return vec![points[anchor]];
    }

    let n = points.len();
    let rotated: Vec<Point2D> = points[anchor..]
        .iter()
        .chain(&points[..anchor])
        .copied()
        .collect();
    let split = (opposite + n - anchor) % n;
    let start = rotated[0];

    let first: Vec<Point<f64>> = rotated[..=split].iter().map(|&p| p.into()).collect();
    let second: Vec<Point<f64>> = rotated[split..]
        .iter()
        .chain(std::iter::once(&start))
        .map(|&p| p.into())
        .collect();

    let head = approximate_polygon_dp(&first, epsilon, false);
    let tail = approximate_polygon_dp(&second, epsilon, false);

    // `tail` starts at the split point and ends back at `start`; both are
    // already in `head`.
    let tail_inner = &tail[1..tail.len() - 1];
    head.into_iter()
        .chain(tail_inner.iter().copied())
        .map(Point2D::from)
        .collect()
}

/// Indices of two mutually distant points, found by hopping to the farthest
/// point a few times starting from the first one.
fn diameter_ends(points: &[Point2D]) -> (usize, usize) {
    let mut anchor = 0;
    let mut opposite = farthest_from(points, anchor);
    for _ in 0..2 {
        let next = farthest_from(points, opposite);
        if next == anchor {
            break;
        }
        anchor = opposite;
        opposite = next;
    }
    (anchor, opposite)
}

/// Index of the point farthest from `points[from]`; `from` itself when every
/// point coincides with it.
fn farthest_from(points: &[Point2D], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut farthest = 0.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > farthest {
            farthest = d;
            best = i;
        }
    }
    best
}
