use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;

/// Proportionally resize so the result is `target_height` pixels tall.
///
/// Returns the resized copy and the ratio `source height / target height`
/// needed to map detection coordinates back onto the source.
pub fn resize_to_height(img: &DynamicImage, target_height: u32) -> (DynamicImage, f64) {
    let (width, height) = (img.width(), img.height());
    let ratio = height as f64 / target_height as f64;
    let target_width = ((width as f64 / ratio) as u32).max(1);
    let resized = img.resize_exact(target_width, target_height, FilterType::Triangle);
    (resized, ratio)
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Standard deviation matching a square Gaussian kernel of the given size.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian blur with the kernel given by size rather than sigma.
pub fn gaussian_blur(img: &GrayImage, kernel_size: u32) -> GrayImage {
    gaussian_blur_f32(img, kernel_sigma(kernel_size))
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Thicken edges by `radius` pixels so small breaks at corners join up.
pub fn close_edge_gaps(edges: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return edges.clone();
    }
    dilate(edges, Norm::LInf, radius)
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel becomes white when it is brighter than the mean of its
/// `block_size` neighbourhood minus `constant`, black otherwise.
pub fn adaptive_threshold(gray: &GrayImage, block_size: u32, constant: i32) -> GrayImage {
    let local_mean = gaussian_blur(gray, block_size);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y)[0] as i32;
        let threshold = local_mean.get_pixel(x, y)[0] as i32 - constant;
        if pixel > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
