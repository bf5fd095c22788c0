use image::{imageops, math::Rect};
use imageproc::{
    contours::{Contour, find_contours},
    point::Point,
};
use num::{Num, NumCast};
use num_traits::AsPrimitive;

use crate::{
    error::{AnalysisError, Result},
    rect::bounding_rect,
    segmentation::{BACKGROUND, Mask},
};

/// The region chosen as "the plant": its simplified boundary and derived geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRegion {
    pub contour: Vec<Point<i32>>,
    /// Enclosed polygon area in square pixels
    pub area: f64,
    pub bounding_box: Rect,
}

/// Computes the enclosed area of a closed polygon with the shoelace formula.
///
/// The loop is closed implicitly between the last and first point. Contours with fewer than 3
/// points enclose no area.
pub fn polygon_area<T>(points: &[Point<T>]) -> f64
where
    T: Num + NumCast + Copy + AsPrimitive<f64>,
{
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let (x1, y1): (f64, f64) = (p1.x.as_(), p1.y.as_());
            let (x2, y2): (f64, f64) = (p2.x.as_(), p2.y.as_());
            x1 * y2 - x2 * y1
        })
        .sum();

    twice_area.abs() / 2.0
}

/// Drops the interior points of horizontal, vertical and diagonal runs, keeping only the points
/// where the boundary changes direction.
pub fn approximate_simple(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: Point<i32>, b: Point<i32>| (b.x - a.x, b.y - a.y);

    let simplified: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    // A closed straight run (e.g. a one-pixel-thick line traced there and back) never turns
    // at an interior point, but its end points always survive.
    if simplified.is_empty() {
        points.to_vec()
    } else {
        simplified
    }
}

/// Keeps only top-level boundaries, dropping holes and everything nested inside them.
pub fn retain_external(contours: &mut Vec<Contour<i32>>) {
    contours.retain(|contour| contour.parent.is_none());
}

/// Copy of `mask` surrounded by a one-pixel background frame, so regions touching the image
/// edge still get a closed outer border.
fn pad_mask(mask: &Mask) -> Mask {
    let mut padded = Mask::from_pixel(mask.width() + 2, mask.height() + 2, BACKGROUND);
    imageops::replace(&mut padded, mask, 1, 1);
    padded
}

/// Finds the external contours of `mask`, simplified, in raster-scan discovery order.
pub fn external_contours(mask: &Mask) -> Vec<Vec<Point<i32>>> {
    let mut contours = find_contours::<i32>(&pad_mask(mask));
    retain_external(&mut contours);
    contours
        .into_iter()
        .map(|contour| {
            let points: Vec<Point<i32>> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            approximate_simple(&points)
        })
        .collect()
}

/// Selects the external contour with the largest enclosed area.
///
/// Ties go to the contour discovered first.
///
/// # Errors
///
/// [`AnalysisError::NoRegionFound`] when the mask has no foreground contour.
pub fn select_largest_region(mask: &Mask) -> Result<PlantRegion> {
    let contours = external_contours(mask);
    tracing::debug!(count = contours.len(), "found external contours");

    let (contour, area) = contours
        .into_iter()
        .map(|points| {
            let area = polygon_area(&points);
            (points, area)
        })
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .ok_or(AnalysisError::NoRegionFound)?;

    let bounding_box = bounding_rect(&contour).ok_or(AnalysisError::NoRegionFound)?;

    Ok(PlantRegion {
        contour,
        area,
        bounding_box,
    })
}
