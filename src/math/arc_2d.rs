/// 2D elliptical arc math for path data.
///
/// Arcs in path data are given in endpoint form (start, end, radii, rotation,
/// flags). Sampling needs center form, which [`EllipticalArc::from_endpoints`]
/// recovers.
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, TOLERANCE};

/// An elliptical arc in center parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    /// Center of the ellipse.
    pub center: Point2,
    /// Radius along the rotated x axis.
    pub rx: f64,
    /// Radius along the rotated y axis.
    pub ry: f64,
    /// Rotation of the ellipse x axis, in radians.
    pub rotation: f64,
    /// Parametric start angle.
    pub start_angle: f64,
    /// Signed parametric sweep; positive sweeps toward increasing angle.
    pub sweep: f64,
}

impl EllipticalArc {
    /// Converts an endpoint-form arc to center form.
    ///
    /// Returns `None` when the arc degenerates to a straight line: a zero
    /// radius or coincident endpoints. Radii too small to span the endpoints
    /// are scaled up uniformly until they fit.
    #[must_use]
    #[allow(clippy::similar_names, clippy::many_single_char_names)]
    pub fn from_endpoints(
        from: Point2,
        to: Point2,
        rx: f64,
        ry: f64,
        rotation_deg: f64,
        large_arc: bool,
        sweep_positive: bool,
    ) -> Option<Self> {
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx < TOLERANCE || ry < TOLERANCE || (to - from).norm() < TOLERANCE {
            return None;
        }

        let rotation = rotation_deg.to_radians();
        let (sin_phi, cos_phi) = rotation.sin_cos();

        let dx2 = (from.x - to.x) * 0.5;
        let dy2 = (from.y - to.y) * 0.5;
        let x1 = cos_phi * dx2 + sin_phi * dy2;
        let y1 = -sin_phi * dx2 + cos_phi * dy2;

        let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1 * y1 - ry2 * x1 * x1;
        let den = rx2 * y1 * y1 + ry2 * x1 * x1;
        let sign = if large_arc == sweep_positive { -1.0 } else { 1.0 };
        let coef = if den > 0.0 {
            sign * (num / den).max(0.0).sqrt()
        } else {
            0.0
        };
        let cx1 = coef * rx * y1 / ry;
        let cy1 = -coef * ry * x1 / rx;

        let center = Point2::new(
            cos_phi * cx1 - sin_phi * cy1 + (from.x + to.x) * 0.5,
            sin_phi * cx1 + cos_phi * cy1 + (from.y + to.y) * 0.5,
        );

        let u = Vector2::new((x1 - cx1) / rx, (y1 - cy1) / ry);
        let v = Vector2::new((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        let start_angle = vector_angle(&Vector2::x(), &u);
        let mut sweep = vector_angle(&u, &v);
        if !sweep_positive && sweep > 0.0 {
            sweep -= TAU;
        } else if sweep_positive && sweep < 0.0 {
            sweep += TAU;
        }

        Some(Self {
            center,
            rx,
            ry,
            rotation,
            start_angle,
            sweep,
        })
    }

    /// Evaluates the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        let (sin_a, cos_a) = angle.sin_cos();
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        Point2::new(
            self.center.x + self.rx * cos_phi * cos_a - self.ry * sin_phi * sin_a,
            self.center.y + self.rx * sin_phi * cos_a + self.ry * cos_phi * sin_a,
        )
    }

    /// Returns the larger of the two radii.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.rx.max(self.ry)
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // sagitta = r * (1 - cos(θ/2)), solved for θ at the tolerance.
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

/// Signed angle from `u` to `v`.
fn vector_angle(u: &Vector2, v: &Vector2) -> f64 {
    (u.x * v.y - u.y * v.x).atan2(u.dot(v))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn semicircle_center_is_chord_midpoint() {
        let arc = EllipticalArc::from_endpoints(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            5.0,
            5.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        assert_relative_eq!(arc.center.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(arc.center.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep.abs(), PI, epsilon = 1e-9);
    }

    #[test]
    fn endpoints_are_reproduced() {
        let from = Point2::new(1.0, 2.0);
        let to = Point2::new(6.0, 4.0);
        let arc = EllipticalArc::from_endpoints(from, to, 4.0, 3.0, 30.0, true, false).unwrap();
        let start = arc.point_at(0.0);
        let end = arc.point_at(1.0);
        assert_relative_eq!(start.x, from.x, epsilon = 1e-9);
        assert_relative_eq!(start.y, from.y, epsilon = 1e-9);
        assert_relative_eq!(end.x, to.x, epsilon = 1e-9);
        assert_relative_eq!(end.y, to.y, epsilon = 1e-9);
    }

    #[test]
    fn undersized_radii_are_scaled_up() {
        let arc = EllipticalArc::from_endpoints(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        assert_relative_eq!(arc.rx, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_radius_is_a_line() {
        let arc = EllipticalArc::from_endpoints(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            0.0,
            5.0,
            0.0,
            false,
            true,
        );
        assert!(arc.is_none());
    }

    #[test]
    fn sweep_flag_controls_direction() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(10.0, 0.0);
        let pos = EllipticalArc::from_endpoints(from, to, 5.0, 5.0, 0.0, false, true).unwrap();
        let neg = EllipticalArc::from_endpoints(from, to, 5.0, 5.0, 0.0, false, false).unwrap();
        assert!(pos.sweep > 0.0);
        assert!(neg.sweep < 0.0);
    }

    #[test]
    fn subdivision_count_grows_with_radius() {
        let small = arc_subdivision_count(1.0, PI, 0.01);
        let large = arc_subdivision_count(100.0, PI, 0.01);
        assert!(large > small);
        assert_eq!(arc_subdivision_count(0.0, PI, 0.01), 1);
    }
}
