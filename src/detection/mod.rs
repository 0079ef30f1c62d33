//! Detection-scale stages: preprocessing, contour extraction and picking the
//! document outline.

pub mod contours;
pub mod preprocessing;
pub mod quad;

pub use contours::find_contours;
pub use quad::QuadrilateralFinder;
