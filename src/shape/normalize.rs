use tracing::{debug, warn};

use crate::error::{Result, SignError};
use crate::math::polygon_2d::{bounds_2d, clean_contour, point_in_polygon_2d, signed_area_2d};
use crate::math::{Point2, TOLERANCE};
use crate::outline::{flatten_commands, FlattenParams, Outline, PathRecord};

use super::Shape;

/// Contours whose absolute area falls below this are dropped as degenerate.
const MIN_CONTOUR_AREA: f64 = 1e-9;

/// Shapes produced from one path record of an outline.
#[derive(Debug, Clone)]
pub struct RecordShapes {
    /// Index of the record in [`Outline::paths`].
    pub index: usize,
    pub shapes: Vec<Shape>,
}

/// A path record that could not be turned into shapes.
#[derive(Debug)]
pub struct RecordFailure {
    /// Index of the record in [`Outline::paths`].
    pub index: usize,
    pub error: SignError,
}

/// Result of normalizing a whole outline.
///
/// Records that fail to parse are reported in `failures`; the remaining
/// records are still processed.
#[derive(Debug, Default)]
pub struct NormalizedOutline {
    pub records: Vec<RecordShapes>,
    pub failures: Vec<RecordFailure>,
    /// Extent of every flattened contour, `None` if nothing was drawn.
    pub bounds: Option<(Point2, Point2)>,
}

impl NormalizedOutline {
    /// Iterates over every shape of every record, in record order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.records.iter().flat_map(|r| r.shapes.iter())
    }

    /// Total number of shapes.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.records.iter().map(|r| r.shapes.len()).sum()
    }
}

/// Normalizes every record of an outline into shapes.
///
/// A malformed record is logged and recorded as a failure; it never prevents
/// its siblings from being processed.
#[must_use]
pub fn normalize_outline(outline: &Outline, params: &FlattenParams) -> NormalizedOutline {
    let mut result = NormalizedOutline::default();
    let mut extent: Vec<Point2> = Vec::new();

    for (index, record) in outline.paths.iter().enumerate() {
        match record_contours(record, params) {
            Ok(contours) => {
                for contour in &contours {
                    if let Some((min, max)) = bounds_2d(contour) {
                        extent.push(min);
                        extent.push(max);
                    }
                }
                let shapes = shapes_from_contours(contours);
                debug!(index, shapes = shapes.len(), "normalized path record");
                result.records.push(RecordShapes { index, shapes });
            }
            Err(error) => {
                warn!(index, %error, "skipping malformed path record");
                result.failures.push(RecordFailure { index, error });
            }
        }
    }

    result.bounds = bounds_2d(&extent);
    result
}

/// Parses and normalizes a single path record.
///
/// # Errors
///
/// Returns [`crate::error::InputError::MalformedPath`] if the record's path
/// data cannot be parsed.
pub fn shapes_from_record(record: &PathRecord, params: &FlattenParams) -> Result<Vec<Shape>> {
    Ok(shapes_from_contours(record_contours(record, params)?))
}

fn record_contours(record: &PathRecord, params: &FlattenParams) -> Result<Vec<Vec<Point2>>> {
    let commands = record.commands()?;
    Ok(flatten_commands(&commands, params))
}

/// Groups raw contours into shapes using containment and winding.
///
/// A contour directly enclosed by a filled contour of opposite winding becomes
/// one of its holes. Any other contour, including an island inside a hole,
/// starts a new shape.
#[must_use]
pub fn shapes_from_contours(contours: Vec<Vec<Point2>>) -> Vec<Shape> {
    let mut candidates: Vec<(Vec<Point2>, f64)> = contours
        .into_iter()
        .filter_map(|raw| {
            let contour = clean_contour(&raw, TOLERANCE);
            let area = signed_area_2d(&contour);
            if contour.len() < 3 || area.abs() < MIN_CONTOUR_AREA {
                debug!(points = contour.len(), area, "dropping degenerate contour");
                None
            } else {
                Some((contour, area))
            }
        })
        .collect();

    // Largest first, so the closest enclosing contour is the last match.
    candidates.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    // For each candidate: Some(shape index) if it is a filled contour.
    let mut owner: Vec<Option<usize>> = Vec::with_capacity(candidates.len());
    let mut exteriors: Vec<Vec<Point2>> = Vec::new();
    let mut holes: Vec<Vec<Vec<Point2>>> = Vec::new();

    for i in 0..candidates.len() {
        let (contour, area) = &candidates[i];
        let sample = contour[0];
        let parent = (0..i)
            .rev()
            .find(|&j| point_in_polygon_2d(&sample, &candidates[j].0));

        let hole_of = parent.and_then(|j| {
            let opposite = (candidates[j].1 > 0.0) != (*area > 0.0);
            owner[j].filter(|_| opposite)
        });

        if let Some(shape) = hole_of {
            holes[shape].push(contour.clone());
            owner.push(None);
        } else {
            owner.push(Some(exteriors.len()));
            exteriors.push(contour.clone());
            holes.push(Vec::new());
        }
    }

    exteriors
        .into_iter()
        .zip(holes)
        .map(|(exterior, holes)| Shape::new(exterior, holes))
        .collect()
}
