use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, TessellationError};
use crate::math::Point2;
use crate::shape::Shape;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the interior of a shape.
///
/// Triangles index the shape's contour vertices in [`Shape::contours`] order
/// (exterior first, then each hole), so the same triangulation can be laid
/// over any ring that keeps the contour vertex order. Every triangle winds
/// counter-clockwise.
pub struct TessellateShape<'a> {
    shape: &'a Shape,
}

impl<'a> TessellateShape<'a> {
    /// Creates a new `TessellateShape` operation.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the triangulation.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::Failed`] if a contour has fewer than three
    /// points, or contours cross, share a vertex, or touch another contour's
    /// edge.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Vec<[u32; 3]>> {
        let mut cdt = Cdt::new();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        let mut positions: Vec<Point2> = Vec::with_capacity(self.shape.vertex_count());

        for contour in self.shape.contours() {
            let handles = insert_points(&mut cdt, contour)?;
            for (handle, point) in handles.iter().zip(contour) {
                let global = positions.len() as u32;
                positions.push(*point);
                vertex_map.insert(handle.index(), global);
            }
            insert_constraint_loop(&mut cdt, &handles)?;
        }

        // Every contour vertex must stay distinct and every contour edge must
        // remain one constraint. A shared vertex or a vertex lying on another
        // contour's edge would leave the cap with points the walls never visit.
        if cdt.num_vertices() != positions.len() || cdt.num_constraints() != positions.len() {
            return Err(TessellationError::Failed(format!(
                "contours touch: {} vertices and {} constraint edges for {} contour points",
                cdt.num_vertices(),
                cdt.num_constraints(),
                positions.len()
            ))
            .into());
        }

        let interior = classify_interior_faces(&cdt);
        let mut triangles = Vec::with_capacity(interior.len());

        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (slot, vh) in tri.iter_mut().zip(face.vertices()) {
                *slot = *vertex_map.get(&vh.fix().index()).ok_or_else(|| {
                    TessellationError::Failed("triangulation produced an unknown vertex".into())
                })?;
            }
            let [a, b, c] = tri.map(|i| positions[i as usize]);
            if (b - a).perp(&(c - a)) < 0.0 {
                tri.swap(1, 2);
            }
            triangles.push(tri);
        }

        Ok(triangles)
    }
}

fn insert_points(cdt: &mut Cdt, points: &[Point2]) -> Result<Vec<FixedVertexHandle>> {
    if points.len() < 3 {
        return Err(
            TessellationError::Failed("constraint loop needs at least 3 points".into()).into(),
        );
    }
    points
        .iter()
        .map(|p| {
            cdt.insert(SpadePoint2::new(p.x, p.y)).map_err(|e: InsertionError| {
                TessellationError::Failed(format!("CDT insert: {e}")).into()
            })
        })
        .collect()
}

/// Inserts a closed loop of vertices as constraint edges.
fn insert_constraint_loop(cdt: &mut Cdt, handles: &[FixedVertexHandle]) -> Result<()> {
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed("contour edges intersect".into()).into());
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Classifies which inner faces of the CDT are inside the shape using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                depth + 1
            } else {
                depth
            };
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn triangulated_area(shape: &Shape, tris: &[[u32; 3]]) -> f64 {
        let pts: Vec<Point2> = shape.contours().flat_map(|c| c.iter().copied()).collect();
        tris.iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (pts[a as usize], pts[b as usize], pts[c as usize]);
                0.5 * (b - a).perp(&(c - a))
            })
            .sum()
    }

    #[test]
    fn square_produces_2_triangles() {
        let shape = Shape::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)], vec![]);
        let tris = TessellateShape::new(&shape).execute().unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(triangulated_area(&shape, &tris), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn l_shape_concave_tessellates() {
        let shape = Shape::new(
            vec![
                p(0.0, 0.0),
                p(4.0, 0.0),
                p(4.0, 2.0),
                p(2.0, 2.0),
                p(2.0, 4.0),
                p(0.0, 4.0),
            ],
            vec![],
        );
        let tris = TessellateShape::new(&shape).execute().unwrap();
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(triangulated_area(&shape, &tris), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn hole_is_excluded() {
        let shape = Shape::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(3.0, 3.0), p(7.0, 3.0), p(7.0, 7.0), p(3.0, 7.0)]],
        );
        let tris = TessellateShape::new(&shape).execute().unwrap();
        assert_eq!(tris.len(), 8);
        assert_relative_eq!(triangulated_area(&shape, &tris), 84.0, epsilon = 1e-9);
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let shape = Shape::new(vec![p(0.0, 0.0), p(0.0, 5.0), p(5.0, 5.0), p(5.0, 0.0)], vec![]);
        let tris = TessellateShape::new(&shape).execute().unwrap();
        let pts = shape.exterior();
        for &[a, b, c] in &tris {
            let (a, b, c) = (pts[a as usize], pts[b as usize], pts[c as usize]);
            assert!((b - a).perp(&(c - a)) > 0.0);
        }
    }

    #[test]
    fn hole_vertex_on_exterior_edge_is_rejected() {
        let shape = Shape::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(5.0, 0.0), p(3.0, 5.0), p(7.0, 5.0)]],
        );
        assert!(TessellateShape::new(&shape).execute().is_err());
    }

    #[test]
    fn hole_sharing_exterior_vertex_is_rejected() {
        let shape = Shape::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(0.0, 0.0), p(4.0, 2.0), p(2.0, 4.0)]],
        );
        assert!(TessellateShape::new(&shape).execute().is_err());
    }

    #[test]
    fn crossing_hole_is_rejected() {
        let shape = Shape::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(5.0, 5.0), p(15.0, 5.0), p(15.0, 8.0), p(5.0, 8.0)]],
        );
        assert!(TessellateShape::new(&shape).execute().is_err());
    }
}
