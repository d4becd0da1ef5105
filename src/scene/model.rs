use slotmap::SlotMap;
use tracing::debug;

use crate::math::{Matrix4, Point3, Vector3};

use super::{ColorSettings, Solid, SolidId};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing every point, `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Largest edge length.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.size().max()
    }

    /// Box enclosing the eight transformed corners.
    #[must_use]
    pub fn transformed(&self, transform: &Matrix4) -> Self {
        let corners: Vec<Point3> = (0..8)
            .map(|i| {
                let pick = |bit: usize, lo: f64, hi: f64| if i & bit == 0 { lo } else { hi };
                transform.transform_point(&Point3::new(
                    pick(1, self.min.x, self.max.x),
                    pick(2, self.min.y, self.max.y),
                    pick(4, self.min.z, self.max.z),
                ))
            })
            .collect();
        Self::from_points(&corners).unwrap_or(*self)
    }
}

/// Where a preview camera should sit to frame the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub target: Point3,
    pub eye: Point3,
    pub distance: f64,
}

/// The assembled sign: every solid recentered and flipped into viewing axes.
#[derive(Debug, Clone)]
pub struct Model {
    solids: SlotMap<SolidId, Solid>,
    bounds: Option<Aabb>,
    transform: Matrix4,
}

/// Mirror about the horizontal axis, turning Y-down authoring coordinates
/// into Y-up viewing coordinates.
fn flip_y() -> Matrix4 {
    Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, -1.0, 1.0))
}

impl Model {
    /// Groups solids into a model centered at the origin.
    ///
    /// Every solid receives the same transform: translate by the negated
    /// center of the union bounds, then flip Y. With no geometry at all the
    /// bounds and center stay undefined.
    #[must_use]
    pub fn assemble(solids: Vec<Solid>) -> Self {
        let bounds = solids
            .iter()
            .filter_map(|s| Aabb::from_points(&s.geometry().vertices))
            .reduce(|a, b| a.union(&b));

        let transform = match &bounds {
            Some(b) => flip_y() * Matrix4::new_translation(&-b.center().coords),
            None => flip_y(),
        };

        let mut store = SlotMap::with_capacity_and_key(solids.len());
        for mut solid in solids {
            solid.transform = transform;
            store.insert(solid);
        }

        let model = Self {
            solids: store,
            bounds,
            transform,
        };
        debug!(
            solids = model.len(),
            triangles = model.triangle_count(),
            "assembled model"
        );
        model
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Solids in assembly order.
    pub fn solids(&self) -> impl Iterator<Item = (SolidId, &Solid)> {
        self.solids.iter()
    }

    #[must_use]
    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solids.get(id)
    }

    /// Union bounds of the solids before recentering, in shape coordinates.
    #[must_use]
    pub fn raw_bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Center of [`Self::raw_bounds`], the offset removed by assembly.
    #[must_use]
    pub fn center(&self) -> Option<Point3> {
        self.bounds.map(|b| b.center())
    }

    /// Bounds in the model frame.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.bounds.map(|b| b.transformed(&self.transform))
    }

    /// The transform shared by every solid.
    #[must_use]
    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.solids.values().map(Solid::triangle_count).sum()
    }

    /// Recolors every solid. Geometry is untouched and repeating the call
    /// with the same colors changes nothing.
    pub fn apply_colors(&mut self, colors: &ColorSettings) {
        for solid in self.solids.values_mut() {
            solid.materials.set_colors(colors);
        }
    }

    /// Camera placement on +Z looking at the model, `None` for an empty model.
    #[must_use]
    pub fn framing(&self) -> Option<Framing> {
        let bounds = self.world_bounds()?;
        let target = bounds.center();
        let distance = bounds.max_dimension() * 1.5;
        Some(Framing {
            target,
            eye: target + Vector3::z() * distance,
            distance,
        })
    }
}
