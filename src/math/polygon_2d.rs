use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Upper bound on the length of a miter vector, relative to the offset distance.
///
/// Sharp spikes (e.g. the tip of a serif) would otherwise push bevel rings far
/// past the neighbouring geometry.
pub const MITER_LIMIT: f64 = 2.0;

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Winding number of `point` with respect to the closed polygon `verts`.
///
/// Non-zero => inside, zero => outside.
#[must_use]
pub fn winding_number_2d(point: &Point2, verts: &[Point2]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];

        if a.y <= point.y {
            if b.y > point.y && cross_2d(b - a, point - a) > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && cross_2d(b - a, point - a) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Returns whether `point` lies inside the closed polygon `verts`.
#[must_use]
pub fn point_in_polygon_2d(point: &Point2, verts: &[Point2]) -> bool {
    winding_number_2d(point, verts) != 0
}

/// Returns the `(min, max)` corners enclosing every point, or `None` when empty.
#[must_use]
pub fn bounds_2d<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<(Point2, Point2)> {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    let (mut min, mut max) = (first, first);
    for p in iter {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Removes consecutive duplicate points and a trailing point equal to the first.
#[must_use]
pub fn clean_contour(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if cleaned
            .last()
            .is_some_and(|last| (p - last).norm() <= tolerance)
        {
            continue;
        }
        cleaned.push(p);
    }
    while cleaned.len() > 1 {
        let (first, last) = (cleaned[0], cleaned[cleaned.len() - 1]);
        if (first - last).norm() <= tolerance {
            cleaned.pop();
        } else {
            break;
        }
    }
    cleaned
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Computes per-vertex miter vectors pointing to the left of travel.
///
/// Moving vertex `i` by `d * vectors[i]` offsets both adjacent edges by `d`,
/// so for a counter-clockwise exterior the vectors point into the material and
/// for a clockwise hole they point away from the hole, also into the material.
/// The miter length is clamped to [`MITER_LIMIT`].
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if two consecutive points coincide.
pub fn miter_vectors(contour: &[Point2]) -> Result<Vec<Vector2>> {
    let n = contour.len();
    let mut vectors = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &contour[(i + n - 1) % n];
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];

        let n_in = left_normal(segment_direction(prev, curr)?);
        let n_out = left_normal(segment_direction(curr, next)?);

        let sum = n_in + n_out;
        let len = sum.norm();
        if len < TOLERANCE {
            // Edge folds back on itself.
            vectors.push(n_in);
            continue;
        }
        let dir = sum / len;
        let cos_half = dir.dot(&n_in);
        let scale = if cos_half > 1.0 / MITER_LIMIT {
            1.0 / cos_half
        } else {
            MITER_LIMIT
        };
        vectors.push(dir * scale);
    }
    Ok(vectors)
}

/// 2D cross product of two vectors.
#[inline]
fn cross_2d(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area_2d(&square()), 100.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert_relative_eq!(signed_area_2d(&pts), -100.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn point_inside_and_outside() {
        let sq = square();
        assert!(point_in_polygon_2d(&Point2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon_2d(&Point2::new(15.0, 5.0), &sq));
    }

    #[test]
    fn winding_sign_follows_orientation() {
        let mut sq = square();
        assert_eq!(winding_number_2d(&Point2::new(5.0, 5.0), &sq), 1);
        sq.reverse();
        assert_eq!(winding_number_2d(&Point2::new(5.0, 5.0), &sq), -1);
    }

    #[test]
    fn bounds_of_square() {
        let (min, max) = bounds_2d(&square()).unwrap();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(max.y, 10.0);
        assert!(bounds_2d(&[]).is_none());
    }

    #[test]
    fn clean_drops_duplicates_and_closing_point() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let cleaned = clean_contour(&pts, 1e-9);
        assert_eq!(cleaned.len(), 3);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &a).is_err());
    }

    #[test]
    fn miter_vectors_point_inward_on_ccw_square() {
        let vectors = miter_vectors(&square()).unwrap();
        assert_relative_eq!(vectors[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(vectors[0].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(vectors[2].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(vectors[2].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn miter_vectors_are_clamped_on_spikes() {
        let spike = vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 1.0),
            Point2::new(0.0, 2.0),
        ];
        let vectors = miter_vectors(&spike).unwrap();
        for v in vectors {
            assert!(v.norm() <= MITER_LIMIT + 1e-12);
        }
    }
}
