use super::Point2;

/// Evaluates a quadratic Bézier curve at parameter `t`.
#[must_use]
pub fn quadratic_point_at(p0: &Point2, p1: &Point2, p2: &Point2, t: f64) -> Point2 {
    let mt = 1.0 - t;
    Point2::from(p0.coords * (mt * mt) + p1.coords * (2.0 * mt * t) + p2.coords * (t * t))
}

/// Evaluates a cubic Bézier curve at parameter `t`.
#[must_use]
pub fn cubic_point_at(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let mt = 1.0 - t;
    Point2::from(
        p0.coords * (mt * mt * mt)
            + p1.coords * (3.0 * mt * mt * t)
            + p2.coords * (3.0 * mt * t * t)
            + p3.coords * (t * t * t),
    )
}

/// Number of uniform segments keeping a quadratic within `tolerance` of its chords.
///
/// Wang's formula for degree 2.
#[must_use]
pub fn quadratic_subdivision_count(p0: &Point2, p1: &Point2, p2: &Point2, tolerance: f64) -> u32 {
    let dd = (p0.coords - p1.coords * 2.0 + p2.coords).norm();
    wang_count(dd * 0.25, tolerance)
}

/// Number of uniform segments keeping a cubic within `tolerance` of its chords.
///
/// Wang's formula for degree 3.
#[must_use]
pub fn cubic_subdivision_count(
    p0: &Point2,
    p1: &Point2,
    p2: &Point2,
    p3: &Point2,
    tolerance: f64,
) -> u32 {
    let dd0 = (p0.coords - p1.coords * 2.0 + p2.coords).norm();
    let dd1 = (p1.coords - p2.coords * 2.0 + p3.coords).norm();
    wang_count(dd0.max(dd1) * 0.75, tolerance)
}

fn wang_count(weighted: f64, tolerance: f64) -> u32 {
    if tolerance <= 0.0 || weighted < 1e-12 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (weighted / tolerance).sqrt().ceil() as u32;
    n.max(1)
}
