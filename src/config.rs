use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Tunables for one scan. Built once by the caller and handed to
/// [`ScanPipeline::new`](crate::pipeline::ScanPipeline::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Height of the downsampled copy used for edge and contour detection.
    pub detection_height: u32,
    /// Odd Gaussian kernel size applied before edge detection.
    pub blur_kernel_size: u32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Dilation radius used to close gaps in the edge map (0 disables it).
    pub edge_dilation: u8,
    /// How many of the largest contours are tried as document candidates.
    pub max_candidates: usize,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// Odd neighbourhood size for adaptive thresholding.
    pub threshold_block_size: u32,
    /// Subtracted from the local mean before comparing.
    pub threshold_constant: i32,
    /// Fill value for output pixels that map outside the source image.
    pub background: u8,
    /// Height of the previews shown in interactive mode.
    pub preview_height: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            detection_height: 500,
            blur_kernel_size: 5,
            canny_low: 100.0,
            canny_high: 200.0,
            edge_dilation: 1,
            max_candidates: 5,
            approx_epsilon_fraction: 0.02,
            threshold_block_size: 11,
            threshold_constant: 11,
            background: 0,
            preview_height: 650,
        }
    }
}

impl ScanConfig {
    /// Load a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |source: Box<dyn std::error::Error + Send + Sync>| ScanError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.into()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| config_error(e.into()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ScanError::InvalidConfig(msg));

        if self.detection_height == 0 {
            return invalid("detection_height must be positive".into());
        }
        if self.blur_kernel_size < 3 || self.blur_kernel_size % 2 == 0 {
            return invalid(format!(
                "blur_kernel_size must be odd and at least 3, got {}",
                self.blur_kernel_size
            ));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return invalid(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} and {}",
                self.canny_low, self.canny_high
            ));
        }
        if self.max_candidates == 0 {
            return invalid("max_candidates must be at least 1".into());
        }
        if !(self.approx_epsilon_fraction > 0.0 && self.approx_epsilon_fraction < 1.0) {
            return invalid(format!(
                "approx_epsilon_fraction must be in (0, 1), got {}",
                self.approx_epsilon_fraction
            ));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return invalid(format!(
                "threshold_block_size must be odd and at least 3, got {}",
                self.threshold_block_size
            ));
        }
        if self.preview_height == 0 {
            return invalid("preview_height must be positive".into());
        }
        Ok(())
    }
}
