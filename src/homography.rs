//! Planar perspective transform between two quadrilaterals.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::models::Point2D;

const EPS: f64 = 1e-12;

/// 3×3 homography, normalised so the bottom-right entry is 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    m: Matrix3<f64>,
}

impl TransformMatrix {
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Wrap a raw matrix. Returns `None` when it cannot be normalised.
    pub fn from_matrix(m: Matrix3<f64>) -> Option<Self> {
        let w = m[(2, 2)];
        if !w.is_finite() || w.abs() < EPS {
            return None;
        }
        let m = m / w;
        m.iter().all(|v| v.is_finite()).then_some(Self { m })
    }

    /// Solve for the transform taking each `src[i]` onto `dst[i]`.
    ///
    /// Four correspondences determine the eight unknowns exactly. Returns
    /// `None` when the system is singular, which happens whenever three of
    /// the points on either side are collinear.
    pub fn from_correspondences(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);

            // u * (h31 x + h32 y + 1) = h11 x + h12 y + h13
            let r = 2 * i;
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -x * u;
            a[(r, 7)] = -y * u;
            b[r] = u;

            // v * (h31 x + h32 y + 1) = h21 x + h22 y + h23
            let r = r + 1;
            a[(r, 3)] = x;
            a[(r, 4)] = y;
            a[(r, 5)] = 1.0;
            a[(r, 6)] = -x * v;
            a[(r, 7)] = -y * v;
            b[r] = v;
        }

        let h = a.lu().solve(&b)?;
        let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        let transform = Self::from_matrix(m)?;

        // LU happily returns garbage for near-singular systems.
        let exact = src.iter().zip(dst.iter()).all(|(s, d)| {
            transform
                .map(*s)
                .is_some_and(|p| (p.x - d.x).abs() < 1e-3 && (p.y - d.y).abs() < 1e-3)
        });
        exact.then_some(transform)
    }

    /// Apply the transform to a point.
    pub fn map(&self, p: Point2D) -> Option<Point2D> {
        let v = self.m * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() < EPS {
            return None;
        }
        let out = Point2D::new(v[0] / w, v[1] / w);
        out.is_finite().then_some(out)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().and_then(Self::from_matrix)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Row-major entries, the layout `imageproc::geometric_transformations::Projection` expects.
    pub fn to_row_major_f32(&self) -> [f32; 9] {
        let m = &self.m;
        [
            m[(0, 0)] as f32,
            m[(0, 1)] as f32,
            m[(0, 2)] as f32,
            m[(1, 0)] as f32,
            m[(1, 1)] as f32,
            m[(1, 2)] as f32,
            m[(2, 0)] as f32,
            m[(2, 1)] as f32,
            m[(2, 2)] as f32,
        ]
    }
}
