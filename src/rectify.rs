//! Perspective rectification of the detected document region.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument};

use crate::error::{Result, ScanError};
use crate::geometry::{distance, order_canonical};
use crate::homography::TransformMatrix;
use crate::models::{CanonicalQuad, Point2D, Quadrilateral};

/// Anything smaller than this many square pixels is treated as collinear.
const MIN_QUAD_AREA: f64 = 1.0;

/// Output sides may be at most this many times the source's longer side.
const MAX_OUTPUT_SCALE: u32 = 4;

/// Result of a rectification.
#[derive(Debug, Clone)]
pub struct Rectified {
    /// The top-down view of the document.
    pub image: DynamicImage,
    /// Corners in source-image coordinates, canonical order.
    pub corners: CanonicalQuad,
    /// Maps source coordinates onto the output raster.
    pub transform: TransformMatrix,
}

/// Warps a quadrilateral region of a full-resolution image onto an upright
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerspectiveRectifier {
    /// Fill value for output pixels that fall outside the source.
    pub background: u8,
}

impl PerspectiveRectifier {
    pub fn new(background: u8) -> Self {
        Self { background }
    }

    /// Rectify `quad`, given in detection-scale coordinates, out of `source`.
    ///
    /// `ratio` is the source height divided by the detection height. The
    /// output keeps the source's grayscale-ness; every other pixel format is
    /// resampled as RGB.
    #[instrument(
        skip(self, source, quad),
        fields(width = source.width(), height = source.height())
    )]
    pub fn rectify(
        &self,
        source: &DynamicImage,
        quad: &Quadrilateral,
        ratio: f64,
    ) -> Result<Rectified> {
        let scaled = quad.scaled(ratio);
        if !scaled.points.iter().all(Point2D::is_finite) {
            return Err(ScanError::degenerate("corner coordinates are not finite"));
        }

        let corners = order_canonical(&scaled);
        let (width, height) = output_size(&corners)?;
        if corners.area() < MIN_QUAD_AREA {
            return Err(ScanError::degenerate("corners are collinear"));
        }
        let limit = source
            .width()
            .max(source.height())
            .saturating_mul(MAX_OUTPUT_SCALE);
        if width > limit || height > limit {
            return Err(ScanError::degenerate(format!(
                "output size {}x{} exceeds {} pixels per side",
                width, height, limit
            )));
        }
        debug!(?corners, width, height, "rectification target computed");

        let transform = transform_to_rectangle(&corners, width, height)?;
        let projection = Projection::from_matrix(transform.to_row_major_f32())
            .ok_or_else(|| ScanError::degenerate("perspective transform is not invertible"))?;

        let image = match source {
            DynamicImage::ImageLuma8(gray) => {
                let mut out = GrayImage::new(width, height);
                warp_into(
                    gray,
                    &projection,
                    Interpolation::Bilinear,
                    Luma([self.background]),
                    &mut out,
                );
                DynamicImage::ImageLuma8(out)
            }
            other => {
                let rgb = other.to_rgb8();
                let mut out = RgbImage::new(width, height);
                warp_into(
                    &rgb,
                    &projection,
                    Interpolation::Bilinear,
                    Rgb([self.background; 3]),
                    &mut out,
                );
                DynamicImage::ImageRgb8(out)
            }
        };

        Ok(Rectified {
            image,
            corners,
            transform,
        })
    }
}

/// Output width and height for a canonical quad.
///
/// Each dimension is the longer of the two opposing sides, truncated to
/// whole pixels.
pub fn output_size(corners: &CanonicalQuad) -> Result<(u32, u32)> {
    let width = distance(corners.bottom_right, corners.bottom_left)
        .trunc()
        .max(distance(corners.top_right, corners.top_left).trunc());
    let height = distance(corners.top_right, corners.bottom_right)
        .trunc()
        .max(distance(corners.top_left, corners.bottom_left).trunc());

    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ScanError::degenerate(format!(
            "output size would be {}x{}",
            width, height
        )));
    }
    Ok((width as u32, height as u32))
}

/// Transform taking the canonical corners onto `(0, 0)`, `(w - 1, 0)`,
/// `(w - 1, h - 1)`, `(0, h - 1)`.
pub fn transform_to_rectangle(
    corners: &CanonicalQuad,
    width: u32,
    height: u32,
) -> Result<TransformMatrix> {
    let right = width as f64 - 1.0;
    let bottom = height as f64 - 1.0;
    let target = [
        Point2D::new(0.0, 0.0),
        Point2D::new(right, 0.0),
        Point2D::new(right, bottom),
        Point2D::new(0.0, bottom),
    ];
    TransformMatrix::from_correspondences(&corners.to_array(), &target)
        .ok_or_else(|| ScanError::degenerate("no perspective transform fits the corners"))
}
