mod tessellate_shape;

pub use tessellate_shape::TessellateShape;

use crate::math::{Matrix4, Point3, Vector3};

/// A triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a vertex and returns its index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, position: Point3, normal: Vector3) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        idx
    }

    /// Appends another mesh, offsetting its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]));
    }

    /// Returns the three corner positions of triangle `i`.
    #[must_use]
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.indices[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Returns a copy with `transform` applied to positions and normals.
    ///
    /// A mirroring transform (negative determinant) also reverses every
    /// triangle so faces keep pointing outward.
    #[must_use]
    pub fn transformed(&self, transform: &Matrix4) -> TriangleMesh {
        let normal_matrix = transform
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|m| m.transpose());
        let mirrored = transform.determinant() < 0.0;

        let vertices = self
            .vertices
            .iter()
            .map(|p| transform.transform_point(p))
            .collect();
        let normals = self
            .normals
            .iter()
            .map(|n| {
                normal_matrix
                    .map(|m| m * n)
                    .and_then(|v| v.try_normalize(crate::math::TOLERANCE))
                    .unwrap_or(*n)
            })
            .collect();
        let indices = if mirrored {
            self.indices.iter().map(|&[a, b, c]| [a, c, b]).collect()
        } else {
            self.indices.clone()
        };

        TriangleMesh {
            vertices,
            normals,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        let n = Vector3::z();
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), n);
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0), n);
        let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0), n);
        mesh.indices.push([a, b, c]);
        mesh
    }

    #[test]
    fn merge_offsets_indices() {
        let mut mesh = unit_triangle();
        mesh.merge(&unit_triangle());
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices[1], [3, 4, 5]);
    }

    #[test]
    fn mirror_reverses_winding_and_normals() {
        let flip = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
        let mesh = unit_triangle().transformed(&flip);
        assert_eq!(mesh.indices[0], [0, 2, 1]);
        assert_relative_eq!(mesh.normals[0].z, -1.0);
    }

    #[test]
    fn translation_keeps_winding() {
        let shift = Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0));
        let mesh = unit_triangle().transformed(&shift);
        assert_eq!(mesh.indices[0], [0, 1, 2]);
        assert_relative_eq!(mesh.vertices[1].x, 6.0);
        assert_relative_eq!(mesh.normals[0].z, 1.0);
    }
}
