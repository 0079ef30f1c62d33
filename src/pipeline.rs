use std::fmt;
use std::path::Path;

use image::{DynamicImage, GrayImage};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::ScanConfig;
use crate::detection::preprocessing::{
    adaptive_threshold, close_edge_gaps, detect_edges, gaussian_blur, resize_to_height,
    to_grayscale,
};
use crate::detection::{QuadrilateralFinder, find_contours};
use crate::error::{Result, ScanError};
use crate::io::{load_raster, save_raster};
use crate::models::{CanonicalQuad, Contour, Quadrilateral};
use crate::rectify::PerspectiveRectifier;

/// States a scan passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Loaded,
    DetectionScaled,
    EdgesDetected,
    ContoursFound,
    QuadrilateralSelected,
    Rectified,
    PostProcessed,
    Written,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Loaded,
        Stage::DetectionScaled,
        Stage::EdgesDetected,
        Stage::ContoursFound,
        Stage::QuadrilateralSelected,
        Stage::Rectified,
        Stage::PostProcessed,
        Stage::Written,
    ];

    /// Position in the pipeline, starting at 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short identifier, used for file names.
    pub fn slug(self) -> &'static str {
        match self {
            Stage::Loaded => "loaded",
            Stage::DetectionScaled => "detection_scaled",
            Stage::EdgesDetected => "edges_detected",
            Stage::ContoursFound => "contours_found",
            Stage::QuadrilateralSelected => "quadrilateral_selected",
            Stage::Rectified => "rectified",
            Stage::PostProcessed => "post_processed",
            Stage::Written => "written",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "loading",
            Stage::DetectionScaled => "detection scaling",
            Stage::EdgesDetected => "edge detection",
            Stage::ContoursFound => "contour extraction",
            Stage::QuadrilateralSelected => "quadrilateral selection",
            Stage::Rectified => "rectification",
            Stage::PostProcessed => "post-processing",
            Stage::Written => "writing",
        };
        f.write_str(name)
    }
}

/// What a stage produced, handed to observers right after it completes.
#[derive(Debug, Clone, Copy)]
pub enum Snapshot<'a> {
    Loaded {
        original: &'a DynamicImage,
    },
    DetectionScaled {
        resized: &'a DynamicImage,
        ratio: f64,
    },
    EdgesDetected {
        original: &'a DynamicImage,
        edges: &'a GrayImage,
    },
    ContoursFound {
        contours: &'a [Contour],
    },
    QuadrilateralSelected {
        resized: &'a DynamicImage,
        quad: &'a Quadrilateral,
    },
    Rectified {
        image: &'a DynamicImage,
        corners: &'a CanonicalQuad,
    },
    PostProcessed {
        original: &'a DynamicImage,
        scanned: &'a GrayImage,
    },
    Written {
        path: &'a Path,
    },
}

impl Snapshot<'_> {
    pub fn stage(&self) -> Stage {
        match self {
            Snapshot::Loaded { .. } => Stage::Loaded,
            Snapshot::DetectionScaled { .. } => Stage::DetectionScaled,
            Snapshot::EdgesDetected { .. } => Stage::EdgesDetected,
            Snapshot::ContoursFound { .. } => Stage::ContoursFound,
            Snapshot::QuadrilateralSelected { .. } => Stage::QuadrilateralSelected,
            Snapshot::Rectified { .. } => Stage::Rectified,
            Snapshot::PostProcessed { .. } => Stage::PostProcessed,
            Snapshot::Written { .. } => Stage::Written,
        }
    }
}

/// Hook invoked between stages, e.g. to show or dump intermediate images.
///
/// Observers cannot influence the scan. An error is logged and the scan
/// carries on.
pub trait StageObserver {
    fn observe(&mut self, snapshot: &Snapshot<'_>) -> anyhow::Result<()>;
}

impl<F> StageObserver for F
where
    F: FnMut(&Snapshot<'_>) -> anyhow::Result<()>,
{
    fn observe(&mut self, snapshot: &Snapshot<'_>) -> anyhow::Result<()> {
        self(snapshot)
    }
}

/// A scan that stopped at `stage`.
#[derive(Debug, Error)]
#[error("{stage} failed")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub reason: ScanError,
}

impl PipelineFailure {
    pub fn new(stage: Stage, reason: ScanError) -> Self {
        Self { stage, reason }
    }
}

fn failed_at(stage: Stage) -> impl FnOnce(ScanError) -> PipelineFailure {
    move |reason| PipelineFailure::new(stage, reason)
}

/// Everything a successful scan produces.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Document corners in source-image coordinates.
    pub corners: CanonicalQuad,
    /// Top-down view before binarization.
    pub rectified: DynamicImage,
    /// Final black-and-white page.
    pub binarized: GrayImage,
}

/// Photograph in, flat binarized page out.
pub struct ScanPipeline {
    config: ScanConfig,
    finder: QuadrilateralFinder,
    rectifier: PerspectiveRectifier,
    observers: Vec<Box<dyn StageObserver>>,
}

impl ScanPipeline {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            finder: QuadrilateralFinder::new(config.max_candidates, config.approx_epsilon_fraction),
            rectifier: PerspectiveRectifier::new(config.background),
            config,
            observers: Vec::new(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Register an observer; observers run in registration order.
    pub fn with_observer(mut self, observer: Box<dyn StageObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    fn notify(&mut self, snapshot: Snapshot<'_>) {
        for observer in &mut self.observers {
            if let Err(e) = observer.observe(&snapshot) {
                warn!(stage = %snapshot.stage(), error = %e, "stage observer failed");
            }
        }
    }

    /// Load `input`, scan it and write the result to `output`.
    ///
    /// Nothing is written unless every stage before [`Stage::Written`] succeeds.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn run(
        &mut self,
        input: &Path,
        output: &Path,
    ) -> std::result::Result<ScanOutput, PipelineFailure> {
        let original = load_raster(input).map_err(failed_at(Stage::Loaded))?;
        let result = self.scan(&original)?;

        let page = DynamicImage::ImageLuma8(result.binarized);
        save_raster(output, &page).map_err(failed_at(Stage::Written))?;
        info!(path = %output.display(), "scan written");
        self.notify(Snapshot::Written { path: output });

        Ok(ScanOutput {
            binarized: page.into_luma8(),
            ..result
        })
    }

    /// Run every in-memory stage on an already loaded image.
    #[instrument(skip_all, fields(width = original.width(), height = original.height()))]
    pub fn scan(
        &mut self,
        original: &DynamicImage,
    ) -> std::result::Result<ScanOutput, PipelineFailure> {
        self.notify(Snapshot::Loaded { original });

        let (width, height) = (original.width(), original.height());
        if width == 0 || height == 0 {
            return Err(PipelineFailure::new(
                Stage::DetectionScaled,
                ScanError::EmptyImage { width, height },
            ));
        }
        let (resized, ratio) = resize_to_height(original, self.config.detection_height);
        debug!(
            width = resized.width(),
            height = resized.height(),
            ratio,
            "detection copy ready"
        );
        self.notify(Snapshot::DetectionScaled {
            resized: &resized,
            ratio,
        });

        let gray = to_grayscale(&resized);
        let blurred = gaussian_blur(&gray, self.config.blur_kernel_size);
        let edges = detect_edges(&blurred, self.config.canny_low, self.config.canny_high);
        let edges = close_edge_gaps(&edges, self.config.edge_dilation);
        self.notify(Snapshot::EdgesDetected {
            original,
            edges: &edges,
        });

        let contours = find_contours(&edges);
        debug!(count = contours.len(), "contours traced");
        self.notify(Snapshot::ContoursFound {
            contours: &contours,
        });

        let quad = self
            .finder
            .find(&contours)
            .map_err(failed_at(Stage::QuadrilateralSelected))?;
        info!(corners = ?quad.points, "document outline found");
        self.notify(Snapshot::QuadrilateralSelected {
            resized: &resized,
            quad: &quad,
        });

        let rectified = self
            .rectifier
            .rectify(original, &quad, ratio)
            .map_err(failed_at(Stage::Rectified))?;
        info!(
            width = rectified.image.width(),
            height = rectified.image.height(),
            "perspective corrected"
        );
        self.notify(Snapshot::Rectified {
            image: &rectified.image,
            corners: &rectified.corners,
        });

        let binarized = adaptive_threshold(
            &to_grayscale(&rectified.image),
            self.config.threshold_block_size,
            self.config.threshold_constant,
        );
        self.notify(Snapshot::PostProcessed {
            original,
            scanned: &binarized,
        });

        Ok(ScanOutput {
            corners: rectified.corners,
            rectified: rectified.image,
            binarized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn failure_names_stage() {
        let failure = PipelineFailure::new(
            Stage::QuadrilateralSelected,
            ScanError::NotFound { examined: 5 },
        );
        assert_eq!(failure.to_string(), "quadrilateral selection failed");
        assert!(
            std::error::Error::source(&failure)
                .unwrap()
                .to_string()
                .contains("no document detected")
        );
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = ScanConfig {
            threshold_block_size: 10,
            ..ScanConfig::default()
        };
        assert!(ScanPipeline::new(config).is_err());
    }
}
