use crate::math::Matrix4;
use crate::tessellation::TriangleMesh;

use super::{MaterialSlot, SolidMaterials};

slotmap::new_key_type! {
    /// Unique identifier for a solid in a model.
    pub struct SolidId;
}

/// A contiguous triangle range drawn with one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialGroup {
    /// First triangle of the range.
    pub start: usize,
    /// Number of triangles.
    pub count: usize,
    pub slot: MaterialSlot,
}

impl MaterialGroup {
    #[must_use]
    pub fn new(start: usize, count: usize, slot: MaterialSlot) -> Self {
        Self { start, count, slot }
    }
}

/// One extruded mesh unit.
///
/// Geometry is stored in shape coordinates; `transform` maps it into the
/// shared model frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    geometry: TriangleMesh,
    groups: Vec<MaterialGroup>,
    pub materials: SolidMaterials,
    pub transform: Matrix4,
}

impl Solid {
    /// Creates a solid with default materials and an identity transform.
    #[must_use]
    pub fn new(geometry: TriangleMesh, groups: Vec<MaterialGroup>) -> Self {
        Self {
            geometry,
            groups,
            materials: SolidMaterials::default(),
            transform: Matrix4::identity(),
        }
    }

    /// A solid with no geometry, used for degenerate input.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(TriangleMesh::default(), Vec::new())
    }

    #[must_use]
    pub fn geometry(&self) -> &TriangleMesh {
        &self.geometry
    }

    #[must_use]
    pub fn groups(&self) -> &[MaterialGroup] {
        &self.groups
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    /// Geometry with `transform` applied.
    #[must_use]
    pub fn world_geometry(&self) -> TriangleMesh {
        self.geometry.transformed(&self.transform)
    }
}
