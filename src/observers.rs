//! Stage observers: dumping intermediate images and stepping through a scan
//! interactively.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::detection::preprocessing::resize_to_height;
use crate::models::Quadrilateral;
use crate::pipeline::{Snapshot, StageObserver};

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Copy of `image` with the quadrilateral drawn on top in green.
pub fn draw_outline(image: &DynamicImage, quad: &Quadrilateral) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for i in 0..4 {
        let a = quad.points[i];
        let b = quad.points[(i + 1) % 4];
        // Two pixels wide.
        for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32 + dx, a.y as f32 + dy),
                (b.x as f32 + dx, b.y as f32 + dy),
                OUTLINE_COLOR,
            );
        }
    }
    canvas
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to save {}", path.display()))
}

/// Writes one PNG per stage into a directory.
pub struct DebugDirObserver {
    dir: PathBuf,
}

impl DebugDirObserver {
    /// The directory must be empty or not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() {
            let mut entries = std::fs::read_dir(&dir)?;
            if entries.next().is_some() {
                anyhow::bail!("Debug directory is not empty: {}", dir.display());
            }
        } else {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save(&self, snapshot: &Snapshot<'_>, image: &DynamicImage) -> Result<()> {
        let stage = snapshot.stage();
        let path = self
            .dir
            .join(format!("{:02}_{}.png", stage.index(), stage.slug()));
        save_png(image, &path)?;
        tracing::debug!(path = %path.display(), "debug image saved");
        Ok(())
    }
}

impl StageObserver for DebugDirObserver {
    fn observe(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        match *snapshot {
            Snapshot::Loaded { original } => self.save(snapshot, original),
            Snapshot::DetectionScaled { resized, .. } => self.save(snapshot, resized),
            Snapshot::EdgesDetected { edges, .. } => {
                self.save(snapshot, &DynamicImage::ImageLuma8(edges.clone()))
            }
            Snapshot::QuadrilateralSelected { resized, quad } => self.save(
                snapshot,
                &DynamicImage::ImageRgb8(draw_outline(resized, quad)),
            ),
            Snapshot::Rectified { image, .. } => self.save(snapshot, image),
            Snapshot::PostProcessed { scanned, .. } => {
                self.save(snapshot, &DynamicImage::ImageLuma8(scanned.clone()))
            }
            Snapshot::ContoursFound { .. } | Snapshot::Written { .. } => Ok(()),
        }
    }
}

/// Shows the three classic scanner steps and waits for Enter after each.
///
/// Previews are written to `preview_dir` and their paths printed, since the
/// tool has no window of its own.
pub struct InteractiveObserver<R, W> {
    input: R,
    output: W,
    preview_dir: PathBuf,
    preview_height: u32,
}

impl InteractiveObserver<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(preview_dir: impl Into<PathBuf>, preview_height: u32) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), preview_dir, preview_height)
    }
}

impl<R: BufRead, W: Write> InteractiveObserver<R, W> {
    pub fn new(input: R, output: W, preview_dir: impl Into<PathBuf>, preview_height: u32) -> Self {
        Self {
            input,
            output,
            preview_dir: preview_dir.into(),
            preview_height,
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn preview(&self, image: &DynamicImage) -> DynamicImage {
        resize_to_height(image, self.preview_height).0
    }

    fn show(&mut self, title: &str, images: &[(&str, DynamicImage)]) -> Result<()> {
        writeln!(self.output, "{}", title)?;
        std::fs::create_dir_all(&self.preview_dir)
            .with_context(|| format!("failed to create {}", self.preview_dir.display()))?;
        for (name, image) in images {
            let path = self.preview_dir.join(format!("{}.png", name));
            save_png(image, &path)?;
            writeln!(self.output, "  {}: {}", name, path.display())?;
        }
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        writeln!(self.output)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> StageObserver for InteractiveObserver<R, W> {
    fn observe(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        match *snapshot {
            Snapshot::EdgesDetected { original, edges } => self.show(
                "STEP 1: Edge Detection",
                &[
                    ("image", original.clone()),
                    ("edged", DynamicImage::ImageLuma8(edges.clone())),
                ],
            ),
            Snapshot::QuadrilateralSelected { resized, quad } => self.show(
                "STEP 2: Find contours of paper",
                &[("outline", DynamicImage::ImageRgb8(draw_outline(resized, quad)))],
            ),
            Snapshot::PostProcessed { original, scanned } => {
                let original = self.preview(original);
                let scanned = self.preview(&DynamicImage::ImageLuma8(scanned.clone()));
                self.show(
                    "STEP 3: Apply perspective transform",
                    &[("original", original), ("scanned", scanned)],
                )
            }
            _ => Ok(()),
        }
    }
}
