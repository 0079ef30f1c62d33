use imageproc::point::Point;

use crate::geometry;

/// A point in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, ratio: f64) -> Self {
        Self::new(self.x * ratio, self.y * ratio)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point<f64>> for Point2D {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point<i32>> for Point2D {
    fn from(p: Point<i32>) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl From<Point2D> for Point<f64> {
    fn from(p: Point2D) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Four corners as produced by detection. The order is whatever contour
/// tracing happened to yield and carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    pub points: [Point2D; 4],
}

impl Quadrilateral {
    pub fn new(points: [Point2D; 4]) -> Self {
        Self { points }
    }

    /// Map coordinates from detection scale back to source scale.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self::new(self.points.map(|p| p.scaled(ratio)))
    }
}

/// Corners in top-left, top-right, bottom-right, bottom-left order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalQuad {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl CanonicalQuad {
    pub fn to_array(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Enclosed area; zero for collinear or coincident corners.
    pub fn area(&self) -> f64 {
        geometry::polygon_area(&self.to_array())
    }
}

impl From<CanonicalQuad> for Quadrilateral {
    fn from(quad: CanonicalQuad) -> Self {
        Quadrilateral::new(quad.to_array())
    }
}

/// Closed polygon traced around a connected edge region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point2D>,
}

impl Contour {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (shoelace formula).
    pub fn area(&self) -> f64 {
        geometry::polygon_area(&self.points)
    }

    /// Closed perimeter, including the segment back to the first point.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let points: Vec<Point<f64>> = self.points.iter().map(|&p| p.into()).collect();
        imageproc::geometry::arc_length(&points, true)
    }
}
