use crate::error::{Result, TessellationError};
use crate::math::arc_2d::{arc_subdivision_count, EllipticalArc};
use crate::math::bezier_2d::{
    cubic_point_at, cubic_subdivision_count, quadratic_point_at, quadratic_subdivision_count,
};
use crate::math::Point2;

use super::path_data::PathCommand;

/// Parameters controlling how curves are approximated by line segments.
#[derive(Debug, Clone, Copy)]
pub struct FlattenParams {
    /// Maximum allowed deviation between a curve and its chords.
    pub tolerance: f64,
    /// Minimum number of segments per curved command.
    pub min_segments: u32,
    /// Maximum number of segments per curved command.
    pub max_segments: u32,
}

impl Default for FlattenParams {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            min_segments: 2,
            max_segments: 128,
        }
    }
}

impl FlattenParams {
    /// Creates flattening parameters with the given chord tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] if `tolerance` is not
    /// a positive finite number.
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(TessellationError::InvalidParameters(format!(
                "curve tolerance must be positive, got {tolerance}"
            ))
            .into());
        }
        Ok(Self {
            tolerance,
            ..Self::default()
        })
    }

    fn clamp(&self, n: u32) -> u32 {
        n.clamp(self.min_segments.max(1), self.max_segments.max(1))
    }
}

/// Converts absolute path commands into polygonal contours.
///
/// Each move-to starts a new contour. Contours are returned open (the closing
/// edge is implicit); subpaths without a close command are treated as closed,
/// matching fill semantics.
#[must_use]
pub fn flatten_commands(commands: &[PathCommand], params: &FlattenParams) -> Vec<Vec<Point2>> {
    let mut contours = Vec::new();
    let mut current: Vec<Point2> = Vec::new();
    let mut cursor = Point2::origin();
    let mut subpath_start = Point2::origin();

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                finish(&mut contours, &mut current);
                current.push(p);
                cursor = p;
                subpath_start = p;
            }
            PathCommand::LineTo(to) => {
                begin_if_needed(&mut current, cursor);
                current.push(to);
                cursor = to;
            }
            PathCommand::QuadTo { ctrl, to } => {
                begin_if_needed(&mut current, cursor);
                let n = params.clamp(quadratic_subdivision_count(
                    &cursor,
                    &ctrl,
                    &to,
                    params.tolerance,
                ));
                for i in 1..=n {
                    let t = f64::from(i) / f64::from(n);
                    current.push(quadratic_point_at(&cursor, &ctrl, &to, t));
                }
                cursor = to;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                begin_if_needed(&mut current, cursor);
                let n = params.clamp(cubic_subdivision_count(
                    &cursor,
                    &ctrl1,
                    &ctrl2,
                    &to,
                    params.tolerance,
                ));
                for i in 1..=n {
                    let t = f64::from(i) / f64::from(n);
                    current.push(cubic_point_at(&cursor, &ctrl1, &ctrl2, &to, t));
                }
                cursor = to;
            }
            PathCommand::ArcTo {
                rx,
                ry,
                rotation_deg,
                large_arc,
                sweep,
                to,
            } => {
                begin_if_needed(&mut current, cursor);
                match EllipticalArc::from_endpoints(cursor, to, rx, ry, rotation_deg, large_arc, sweep)
                {
                    Some(arc) => {
                        let n = params.clamp(arc_subdivision_count(
                            arc.max_radius(),
                            arc.sweep.abs(),
                            params.tolerance,
                        ));
                        for i in 1..n {
                            current.push(arc.point_at(f64::from(i) / f64::from(n)));
                        }
                        current.push(to);
                    }
                    None => current.push(to),
                }
                cursor = to;
            }
            PathCommand::Close => {
                finish(&mut contours, &mut current);
                cursor = subpath_start;
            }
        }
    }
    finish(&mut contours, &mut current);
    contours
}

fn begin_if_needed(current: &mut Vec<Point2>, cursor: Point2) {
    if current.is_empty() {
        current.push(cursor);
    }
}

fn finish(contours: &mut Vec<Vec<Point2>>, current: &mut Vec<Point2>) {
    if current.len() > 1 {
        contours.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::outline::path_data::parse_path_data;
    use approx::assert_relative_eq;

    fn flatten(d: &str) -> Vec<Vec<Point2>> {
        flatten_commands(&parse_path_data(d).unwrap(), &FlattenParams::default())
    }

    #[test]
    fn square_is_one_contour() {
        let contours = flatten("M0 0 L10 0 L10 10 L0 10 Z");
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn each_moveto_starts_a_contour() {
        let contours = flatten("M0 0 L10 0 L10 10 Z M20 0 L30 0 L30 10 Z");
        assert_eq!(contours.len(), 2);
        assert_relative_eq!(contours[1][0].x, 20.0);
    }

    #[test]
    fn unclosed_subpath_is_kept() {
        let contours = flatten("M0 0 L10 0 L10 10");
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 3);
    }

    #[test]
    fn drawing_after_close_restarts_at_subpath_start() {
        let contours = flatten("M0 0 L10 0 L10 10 Z L0 10 L-5 5");
        assert_eq!(contours.len(), 2);
        assert_relative_eq!(contours[1][0].x, 0.0);
        assert_relative_eq!(contours[1][0].y, 0.0);
    }

    #[test]
    fn curves_are_subdivided_and_end_on_target() {
        let contours = flatten("M0 0 C0 10 10 10 10 0 Z");
        let c = &contours[0];
        assert!(c.len() > 3, "expected subdivision, got {} points", c.len());
        let last = c.last().unwrap();
        assert_relative_eq!(last.x, 10.0);
        assert_relative_eq!(last.y, 0.0);
    }

    #[test]
    fn circle_from_two_arcs_stays_on_radius() {
        let contours = flatten("M0 5 A5 5 0 0 1 10 5 A5 5 0 0 1 0 5 Z");
        for p in &contours[0] {
            let r = ((p.x - 5.0).powi(2) + (p.y - 5.0).powi(2)).sqrt();
            assert_relative_eq!(r, 5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        assert!(FlattenParams::with_tolerance(0.0).is_err());
        assert!(FlattenParams::with_tolerance(f64::NAN).is_err());
        assert!(FlattenParams::with_tolerance(0.1).is_ok());
    }
}
