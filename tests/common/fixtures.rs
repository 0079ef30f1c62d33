use docscan::{Contour, Point2D, TransformMatrix};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

pub fn p(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

/// Corners where the synthetic page lands in a 400x300 photo.
pub const PHOTO_SIZE: (u32, u32) = (400, 300);
pub const PAGE_SIZE: (u32, u32) = (210, 140);
pub const PHOTO_CORNERS: [(f64, f64); 4] =
    [(60.0, 40.0), (330.0, 60.0), (350.0, 250.0), (40.0, 230.0)];

/// A white page on a black background, "photographed" through the
/// homography taking the page rectangle onto `corners`
/// (top-left, top-right, bottom-right, bottom-left).
pub fn photographed_page(
    photo: (u32, u32),
    page: (u32, u32),
    corners: [(f64, f64); 4],
) -> RgbImage {
    let (pw, ph) = (page.0 as f64, page.1 as f64);
    let page_corners = [p(0.0, 0.0), p(pw, 0.0), p(pw, ph), p(0.0, ph)];
    let photo_corners = corners.map(Point2D::from);
    let to_page = TransformMatrix::from_correspondences(&photo_corners, &page_corners)
        .expect("synthetic homography must be solvable");

    RgbImage::from_fn(photo.0, photo.1, |x, y| {
        let inside = to_page
            .map(p(x as f64, y as f64))
            .is_some_and(|q| q.x >= 0.0 && q.x < pw && q.y >= 0.0 && q.y < ph);
        if inside {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// The default synthetic photo used across tests.
pub fn default_photo() -> DynamicImage {
    DynamicImage::ImageRgb8(photographed_page(PHOTO_SIZE, PAGE_SIZE, PHOTO_CORNERS))
}

/// Smooth grayscale ramp, easy to compare after interpolation.
pub fn gradient_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([(x * 2 + y * 2).min(255) as u8]))
}

/// Pixel-by-pixel trace of an axis-aligned square, clockwise from top-left.
pub fn square_contour(x0: f64, y0: f64, side: u32) -> Contour {
    let s = side as f64;
    let mut points = Vec::new();
    for i in 0..side {
        points.push(p(x0 + i as f64, y0));
    }
    for i in 0..side {
        points.push(p(x0 + s, y0 + i as f64));
    }
    for i in 0..side {
        points.push(p(x0 + s - i as f64, y0 + s));
    }
    for i in 0..side {
        points.push(p(x0, y0 + s - i as f64));
    }
    Contour::new(points)
}

/// Integer-pixel trace around a polygon, visiting `corners` in order and
/// starting `start` points into the trace, so the first point can sit in the
/// middle of an edge the way a raster tracer's first pixel often does.
pub fn polygon_contour(corners: &[(f64, f64)], start: usize) -> Contour {
    let mut points = Vec::new();
    for (i, &(ax, ay)) in corners.iter().enumerate() {
        let (bx, by) = corners[(i + 1) % corners.len()];
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil() as usize;
        for t in 0..steps {
            let f = t as f64 / steps as f64;
            points.push(p((ax + (bx - ax) * f).round(), (ay + (by - ay) * f).round()));
        }
    }
    let start = start % points.len();
    points.rotate_left(start);
    Contour::new(points)
}

/// Photo corners where the top edge rises to the right.
pub const TILTED_CORNERS: [(f64, f64); 4] =
    [(60.0, 44.0), (340.0, 40.0), (344.0, 250.0), (56.0, 254.0)];

pub fn circle_contour(cx: f64, cy: f64, radius: f64, samples: usize) -> Contour {
    let points = (0..samples)
        .map(|i| {
            let t = i as f64 / samples as f64 * std::f64::consts::TAU;
            p(cx + radius * t.cos(), cy + radius * t.sin())
        })
        .collect();
    Contour::new(points)
}

/// All 24 orderings of four items.
pub fn permutations<T: Copy>(items: [T; 4]) -> Vec<[T; 4]> {
    let mut out = Vec::new();
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                for d in 0..4 {
                    let idx = [a, b, c, d];
                    let mut seen = [false; 4];
                    idx.iter().for_each(|&i| seen[i] = true);
                    if seen.iter().all(|&s| s) {
                        out.push(idx.map(|i| items[i]));
                    }
                }
            }
        }
    }
    out
}

pub fn assert_near(actual: Point2D, expected: (f64, f64), tolerance: f64) {
    assert!(
        (actual.x - expected.0).abs() <= tolerance && (actual.y - expected.1).abs() <= tolerance,
        "expected a point within {} of {:?}, got {:?}",
        tolerance,
        expected,
        actual
    );
}
