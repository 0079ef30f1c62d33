#![allow(dead_code)]
#![allow(unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from docscan for tests
pub use docscan::{
    CanonicalQuad, Contour, PerspectiveRectifier, Point2D, QuadrilateralFinder, Quadrilateral,
    ScanConfig, ScanError, ScanPipeline, Stage,
};
