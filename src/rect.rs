use image::math::Rect;
use imageproc::point::Point;
use num_traits::{Num, ToPrimitive};

/// Calculates the axis-aligned bounding box of a set of pixel coordinates.
///
/// Extents are inclusive: a box spanning columns `10..=49` has `width == 40`. Coordinates are
/// expected to lie inside an image; negative values clamp to `0`.
///
/// This version is generic over numeric types that implement `PartialOrd`, so both integer
/// contour points and floating-point vertices work.
///
/// # Returns
///
/// `None` when `points` is empty.
///
/// # Examples
///
/// ```
/// use imageproc::point::Point;
/// use plant_growth::rect::bounding_rect;
///
/// let points = [Point::new(10, 10), Point::new(49, 10), Point::new(49, 39), Point::new(10, 39)];
/// let rect = bounding_rect(&points).unwrap();
///
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (10, 10, 40, 30));
/// ```
pub fn bounding_rect<T>(points: &[Point<T>]) -> Option<Rect>
where
    T: Copy + PartialOrd + Num + ToPrimitive,
{
    let (first, rest) = points.split_first()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;

    // Manual comparison is used here because `T` only has a `PartialOrd`.
    for p in rest {
        if p.x < min_x {
            min_x = p.x;
        }
        if p.x > max_x {
            max_x = p.x;
        }
        if p.y < min_y {
            min_y = p.y;
        }
        if p.y > max_y {
            max_y = p.y;
        }
    }

    let x = min_x.to_u32().unwrap_or(0);
    let y = min_y.to_u32().unwrap_or(0);

    let width = max_x.to_u32().unwrap_or(0).saturating_sub(x) + 1;
    let height = max_y.to_u32().unwrap_or(0).saturating_sub(y) + 1;

    Some(Rect {
        x,
        y,
        width,
        height,
    })
}
