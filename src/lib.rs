pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod homography;
pub mod io;
pub mod models;
pub mod observers;
pub mod pipeline;
pub mod rectify;

pub use config::ScanConfig;
pub use detection::QuadrilateralFinder;
pub use error::{FileAction, ScanError};
pub use homography::TransformMatrix;
pub use models::{CanonicalQuad, Contour, Point2D, Quadrilateral};
pub use observers::{DebugDirObserver, InteractiveObserver};
pub use pipeline::{PipelineFailure, ScanOutput, ScanPipeline, Snapshot, Stage, StageObserver};
pub use rectify::{PerspectiveRectifier, Rectified};
