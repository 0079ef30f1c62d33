//! Reading and writing rasters.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{FileAction, Result, ScanError};

/// Suffix appended to the input's file stem to name the output.
pub const OUTPUT_SUFFIX: &str = "_transformed";
pub const OUTPUT_EXTENSION: &str = "jpg";

fn file_error(action: FileAction, path: &Path, source: image::ImageError) -> ScanError {
    ScanError::File {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Decode an image from disk.
pub fn load_raster(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
        .map_err(|e| file_error(FileAction::Read, path, image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| file_error(FileAction::Read, path, image::ImageError::IoError(e)))?
        .decode()
        .map_err(|e| file_error(FileAction::Read, path, e))?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "image loaded");
    Ok(image)
}

/// Encode an image to disk, choosing the format from the extension.
///
/// The image is written next to the target first and renamed into place, so
/// a failed encode never leaves a truncated file at `path`.
pub fn save_raster(path: impl AsRef<Path>, image: &DynamicImage) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).map_err(|e| file_error(FileAction::Write, path, e))?;

    let mut staging_name = OsString::from(".");
    staging_name.push(path.file_name().unwrap_or_default());
    staging_name.push(".partial");
    let staging = path.with_file_name(staging_name);

    let written = image
        .save_with_format(&staging, format)
        .and_then(|()| std::fs::rename(&staging, path).map_err(image::ImageError::IoError));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(file_error(FileAction::Write, path, e));
    }
    debug!(path = %path.display(), "image written");
    Ok(())
}

/// `<stem>_transformed.jpg`, placed in `dir`.
pub fn output_path_for(input: &Path, dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    dir.join(format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION))
}
