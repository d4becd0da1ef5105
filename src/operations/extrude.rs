use std::f64::consts::FRAC_PI_2;

use tracing::{debug, warn};

use crate::error::{Result, TessellationError};
use crate::math::polygon_2d::miter_vectors;
use crate::math::{Point2, Point3, Vector2, Vector3, TOLERANCE};
use crate::scene::{MaterialGroup, MaterialSlot, Solid};
use crate::shape::Shape;
use crate::tessellation::{TessellateShape, TriangleMesh};

/// Upper bound on [`BevelSettings::segments`].
///
/// Each segment adds a full ring of cap and wall vertices per contour.
pub const MAX_BEVEL_SEGMENTS: u32 = 64;

/// Rounded edge between a cap and the side walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelSettings {
    /// Axial extent of the bevel beyond each end of the walls.
    pub thickness: f64,
    /// Inward inset of the caps relative to the walls.
    pub size: f64,
    /// Number of steps along the bevel profile. Zero behaves like one; at
    /// most [`MAX_BEVEL_SEGMENTS`].
    pub segments: u32,
}

/// Resolved extrusion parameters for one regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionSettings {
    /// Length of the side walls along +Z.
    pub depth: f64,
    pub bevel: Option<BevelSettings>,
}

impl ExtrusionSettings {
    /// Creates settings with a plain (unbevelled) extrusion.
    #[must_use]
    pub fn new(depth: f64) -> Self {
        Self { depth, bevel: None }
    }

    /// Adds a bevel.
    #[must_use]
    pub fn with_bevel(mut self, bevel: BevelSettings) -> Self {
        self.bevel = Some(bevel);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(TessellationError::InvalidParameters(format!(
                "extrusion depth must be finite and non-negative, got {}",
                self.depth
            ))
            .into());
        }
        if let Some(bevel) = &self.bevel {
            let sizes = [bevel.thickness, bevel.size];
            if sizes.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(TessellationError::InvalidParameters(
                    "bevel thickness and size must be finite and non-negative".into(),
                )
                .into());
            }
            if bevel.segments > MAX_BEVEL_SEGMENTS {
                return Err(TessellationError::InvalidParameters(format!(
                    "bevel segments must be at most {MAX_BEVEL_SEGMENTS}, got {}",
                    bevel.segments
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Picks the wall depth for an outline.
///
/// With `dynamic` set, the depth is a quarter of `outline_height`; when the
/// height is unknown the explicit depth is used instead.
#[must_use]
pub fn effective_depth(explicit: f64, dynamic: bool, outline_height: Option<f64>) -> f64 {
    match outline_height {
        Some(height) if dynamic => height.abs() / 4.0,
        _ => explicit,
    }
}

/// One cross-section of the extruded solid.
#[derive(Debug, Clone, Copy)]
struct Ring {
    z: f64,
    inset: f64,
}

/// Extrudes a shape along +Z into a solid with cap and side material groups.
pub struct Extrude<'a> {
    shape: &'a Shape,
    settings: ExtrusionSettings,
}

impl<'a> Extrude<'a> {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(shape: &'a Shape, settings: ExtrusionSettings) -> Self {
        Self { shape, settings }
    }

    /// Executes the extrusion.
    ///
    /// The front cap lies at the lowest Z and faces -Z, the back cap at the
    /// highest Z faces +Z. A degenerate shape, a zero depth, or a cap that
    /// cannot be triangulated produces a solid with empty geometry.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] if the depth or bevel
    /// dimensions are negative or not finite.
    pub fn execute(&self) -> Result<Solid> {
        self.settings.validate()?;

        if self.shape.is_degenerate() {
            warn!(
                vertices = self.shape.vertex_count(),
                "degenerate shape, emitting empty solid"
            );
            return Ok(Solid::empty());
        }
        if self.settings.depth <= TOLERANCE {
            warn!(depth = self.settings.depth, "zero extrusion depth, emitting empty solid");
            return Ok(Solid::empty());
        }

        let cap_triangles = match TessellateShape::new(self.shape).execute() {
            Ok(tris) => tris,
            Err(error) => {
                warn!(%error, "cap triangulation failed, emitting empty solid");
                return Ok(Solid::empty());
            }
        };

        let contours: Vec<&[Point2]> = self.shape.contours().collect();
        let miters = contours
            .iter()
            .map(|c| miter_vectors(c))
            .collect::<Result<Vec<_>>>();
        let miters = match miters {
            Ok(m) => m,
            Err(error) => {
                warn!(%error, "contour has a zero-length edge, emitting empty solid");
                return Ok(Solid::empty());
            }
        };

        let rings = self.rings();
        let mut mesh = TriangleMesh::default();

        // Caps
        let cap_start = mesh.triangle_count();
        let (Some(first), Some(last)) = (rings.first(), rings.last()) else {
            return Ok(Solid::empty());
        };
        push_cap(&mut mesh, &contours, &miters, &cap_triangles, *first, false);
        push_cap(&mut mesh, &contours, &miters, &cap_triangles, *last, true);
        let cap_count = mesh.triangle_count() - cap_start;

        // Side walls
        let side_start = mesh.triangle_count();
        for (contour, miter) in contours.iter().zip(&miters) {
            for pair in rings.windows(2) {
                push_wall_band(&mut mesh, contour, miter, pair[0], pair[1]);
            }
        }
        let side_count = mesh.triangle_count() - side_start;

        debug!(
            caps = cap_count,
            sides = side_count,
            rings = rings.len(),
            "extruded shape"
        );

        let groups = vec![
            MaterialGroup::new(cap_start, cap_count, MaterialSlot::Front),
            MaterialGroup::new(side_start, side_count, MaterialSlot::Side),
        ];
        Ok(Solid::new(mesh, groups))
    }

    /// Cross-sections ordered by increasing Z.
    fn rings(&self) -> Vec<Ring> {
        let depth = self.settings.depth;
        let Some(bevel) = self.settings.bevel else {
            return vec![Ring { z: 0.0, inset: 0.0 }, Ring { z: depth, inset: 0.0 }];
        };

        let steps = bevel.segments.max(1);
        let profile: Vec<(f64, f64)> = (0..=steps)
            .map(|k| {
                let angle = f64::from(k) / f64::from(steps) * FRAC_PI_2;
                (bevel.thickness * angle.cos(), bevel.size * (1.0 - angle.sin()))
            })
            .collect();

        let front = profile.iter().map(|&(axial, inset)| Ring { z: -axial, inset });
        let back = profile
            .iter()
            .rev()
            .map(|&(axial, inset)| Ring { z: depth + axial, inset });
        front.chain(back).collect()
    }
}

fn ring_point(point: &Point2, miter: &Vector2, ring: Ring) -> Point3 {
    let p = point + miter * ring.inset;
    Point3::new(p.x, p.y, ring.z)
}

/// Lays the cap triangulation over one ring. `facing_up` keeps the
/// counter-clockwise order (normal +Z); otherwise triangles are reversed.
fn push_cap(
    mesh: &mut TriangleMesh,
    contours: &[&[Point2]],
    miters: &[Vec<Vector2>],
    triangles: &[[u32; 3]],
    ring: Ring,
    facing_up: bool,
) {
    let normal = if facing_up { Vector3::z() } else { -Vector3::z() };
    let base = mesh.vertices.len();
    for (contour, miter) in contours.iter().zip(miters) {
        for (p, m) in contour.iter().zip(miter) {
            mesh.push_vertex(ring_point(p, m, ring), normal);
        }
    }
    #[allow(clippy::cast_possible_truncation)]
    let offset = base as u32;
    mesh.indices.extend(triangles.iter().map(|&[a, b, c]| {
        if facing_up {
            [a + offset, b + offset, c + offset]
        } else {
            [a + offset, c + offset, b + offset]
        }
    }));
}

/// Emits one quad per contour edge between two rings.
///
/// The material lies to the left of every contour edge, so the right-hand
/// side is outward.
fn push_wall_band(
    mesh: &mut TriangleMesh,
    contour: &[Point2],
    miter: &[Vector2],
    lower: Ring,
    upper: Ring,
) {
    let n = contour.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let a = ring_point(&contour[i], &miter[i], lower);
        let b = ring_point(&contour[j], &miter[j], lower);
        let c = ring_point(&contour[j], &miter[j], upper);
        let d = ring_point(&contour[i], &miter[i], upper);

        let edge = contour[j] - contour[i];
        let fallback = Vector3::new(edge.y, -edge.x, 0.0);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(TOLERANCE)
            .or_else(|| (c - a).cross(&(d - a)).try_normalize(TOLERANCE))
            .or_else(|| fallback.try_normalize(TOLERANCE))
            .unwrap_or_else(Vector3::z);

        let ia = mesh.push_vertex(a, normal);
        let ib = mesh.push_vertex(b, normal);
        let ic = mesh.push_vertex(c, normal);
        let id = mesh.push_vertex(d, normal);
        mesh.indices.push([ia, ib, ic]);
        mesh.indices.push([ia, ic, id]);
    }
}
