use image::GrayImage;
use imageproc::contours::BorderType;

use crate::models::{Contour, Point2D};

/// Trace the outer borders of every connected edge region.
///
/// Hole borders are dropped. Contours come back in tracing order, not ranked.
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    imageproc::contours::find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| Contour::new(c.points.into_iter().map(Point2D::from).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn empty_image_has_no_contours() {
        assert!(find_contours(&GrayImage::new(16, 16)).is_empty());
    }

    #[test]
    fn hollow_square_yields_single_outer_border() {
        let mut img = GrayImage::new(30, 30);
        for i in 5..=25 {
            img.put_pixel(i, 5, Luma([255u8]));
            img.put_pixel(i, 25, Luma([255u8]));
            img.put_pixel(5, i, Luma([255u8]));
            img.put_pixel(25, i, Luma([255u8]));
        }
        let contours = find_contours(&img);
        assert_eq!(contours.len(), 1);
        let area = contours[0].area();
        assert!((area - 400.0).abs() < 1.0, "area was {}", area);
    }
}
