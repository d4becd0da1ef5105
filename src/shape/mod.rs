//! Closed 2D shapes with resolved holes, ready for extrusion.

mod normalize;

pub use normalize::{
    normalize_outline, shapes_from_contours, shapes_from_record, NormalizedOutline,
    RecordFailure, RecordShapes,
};

use crate::math::polygon_2d::{bounds_2d, signed_area_2d};
use crate::math::{Point2, TOLERANCE};

/// A closed contour with zero or more holes.
///
/// The exterior always winds counter-clockwise and every hole clockwise, so
/// the material lies to the left of every contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    exterior: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
}

impl Shape {
    /// Creates a shape, reorienting the contours to the shape winding rule.
    #[must_use]
    pub fn new(exterior: Vec<Point2>, holes: Vec<Vec<Point2>>) -> Self {
        let exterior = oriented(exterior, true);
        let holes = holes.into_iter().map(|h| oriented(h, false)).collect();
        Self { exterior, holes }
    }

    /// The counter-clockwise outer contour.
    #[must_use]
    pub fn exterior(&self) -> &[Point2] {
        &self.exterior
    }

    /// The clockwise hole contours.
    #[must_use]
    pub fn holes(&self) -> &[Vec<Point2>] {
        &self.holes
    }

    /// Exterior followed by holes.
    pub fn contours(&self) -> impl Iterator<Item = &[Point2]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Filled area: exterior area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.contours().map(signed_area_2d).sum()
    }

    /// Total number of contour vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.contours().map(<[Point2]>::len).sum()
    }

    /// Returns `true` if the shape encloses no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.exterior.len() < 3 || self.area().abs() < TOLERANCE
    }

    /// The `(min, max)` corners of the exterior, or `None` for an empty shape.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        bounds_2d(&self.exterior)
    }
}

fn oriented(mut contour: Vec<Point2>, ccw: bool) -> Vec<Point2> {
    let area = signed_area_2d(&contour);
    if area.abs() > TOLERANCE && (area > 0.0) != ccw {
        contour.reverse();
    }
    contour
}
