//! STL mesh export.
//!
//! Binary layout: an 80-byte header, a little-endian `u32` triangle count,
//! then one 50-byte record per triangle (normal, three vertices, all `f32`,
//! and a zero `u16` attribute count). STL carries no color or material data.

use std::io::Write;

use tracing::debug;

use crate::error::{ExportError, Result};
use crate::math::{Point3, Vector3};
use crate::scene::Model;

/// Size of the binary STL header in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one binary STL triangle record in bytes.
pub const TRIANGLE_SIZE: usize = 50;

const HEADER_TEXT: &[u8] = b"Binary STL exported by signcraft";

/// One triangle as stored in a binary STL buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlTriangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

/// Every triangle of the model in the shared model frame, with its unit
/// normal (zero for a degenerate triangle).
fn world_triangles(model: &Model) -> impl Iterator<Item = (Vector3, [Point3; 3])> + '_ {
    model.solids().flat_map(|(_, solid)| {
        let mesh = solid.world_geometry();
        (0..mesh.triangle_count())
            .map(|i| {
                let [a, b, c] = mesh.triangle(i);
                let normal = (b - a)
                    .cross(&(c - a))
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                (normal, [a, b, c])
            })
            .collect::<Vec<_>>()
    })
}

/// Writes the model as binary STL.
///
/// An empty model produces a valid buffer with zero triangles.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the writer fails.
pub fn write_binary_stl<W: Write>(model: &Model, mut writer: W) -> Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header).map_err(ExportError::from)?;

    #[allow(clippy::cast_possible_truncation)]
    let count = model.triangle_count() as u32;
    writer.write_all(&count.to_le_bytes()).map_err(ExportError::from)?;

    for (normal, corners) in world_triangles(model) {
        let mut record = [0u8; TRIANGLE_SIZE];
        put_vector(&mut record[0..12], normal.x, normal.y, normal.z);
        for (k, p) in corners.iter().enumerate() {
            let at = 12 + k * 12;
            put_vector(&mut record[at..at + 12], p.x, p.y, p.z);
        }
        writer.write_all(&record).map_err(ExportError::from)?;
    }

    debug!(triangles = count, "wrote binary STL");
    Ok(())
}

/// Serializes the model to an in-memory binary STL buffer.
///
/// # Errors
///
/// Only fails if writing to memory fails, which it does not in practice.
pub fn to_binary_stl(model: &Model) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(HEADER_SIZE + 4 + model.triangle_count() * TRIANGLE_SIZE);
    write_binary_stl(model, &mut buffer)?;
    Ok(buffer)
}

/// Writes three coordinates as little-endian `f32`s.
fn put_vector(out: &mut [u8], x: f64, y: f64, z: f64) {
    #[allow(clippy::cast_possible_truncation)]
    let coords = [x as f32, y as f32, z as f32];
    for (chunk, value) in out.chunks_exact_mut(4).zip(coords) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}

/// Writes the model as ASCII STL.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the writer fails.
pub fn write_ascii_stl<W: Write>(model: &Model, mut writer: W) -> Result<()> {
    write_ascii(model, &mut writer).map_err(ExportError::from)?;
    Ok(())
}

fn write_ascii<W: Write>(model: &Model, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "solid sign")?;
    for (n, [a, b, c]) in world_triangles(model) {
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in [a, b, c] {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid sign")
}

/// Serializes the model to an ASCII STL string.
///
/// # Errors
///
/// Only fails if writing to memory fails, which it does not in practice.
pub fn to_ascii_stl(model: &Model) -> Result<String> {
    let mut buffer = Vec::new();
    write_ascii_stl(model, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Reads the declared triangle count of a binary STL buffer and checks that
/// the buffer length matches it.
///
/// # Errors
///
/// Returns [`ExportError::InvalidBuffer`] if the buffer is shorter than a
/// header or its length disagrees with the declared count.
pub fn decode_stl_triangle_count(buffer: &[u8]) -> Result<u32> {
    let Some(count_bytes) = buffer.get(HEADER_SIZE..HEADER_SIZE + 4) else {
        return Err(ExportError::InvalidBuffer {
            expected: HEADER_SIZE + 4,
            got: buffer.len(),
        }
        .into());
    };
    let count = u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]]);
    let expected = HEADER_SIZE + 4 + count as usize * TRIANGLE_SIZE;
    if buffer.len() != expected {
        return Err(ExportError::InvalidBuffer {
            expected,
            got: buffer.len(),
        }
        .into());
    }
    Ok(count)
}

/// Decodes every triangle of a binary STL buffer.
///
/// # Errors
///
/// Returns [`ExportError::InvalidBuffer`] under the same conditions as
/// [`decode_stl_triangle_count`].
pub fn read_binary_stl(buffer: &[u8]) -> Result<Vec<StlTriangle>> {
    decode_stl_triangle_count(buffer)?;
    Ok(buffer[HEADER_SIZE + 4..]
        .chunks_exact(TRIANGLE_SIZE)
        .map(|record| StlTriangle {
            normal: read_vector(&record[0..12]),
            vertices: [
                read_vector(&record[12..24]),
                read_vector(&record[24..36]),
                read_vector(&record[36..48]),
            ],
        })
        .collect())
}

/// Read three little-endian `f32`s.
fn read_vector(buf: &[u8]) -> [f32; 3] {
    let f = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
    [f(0), f(4), f(8)]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::{Extrude, ExtrusionSettings};
    use crate::scene::Solid;
    use crate::shape::Shape;

    fn cube_model() -> Model {
        let shape = Shape::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
            ],
            vec![],
        );
        let solid = Extrude::new(&shape, ExtrusionSettings::new(2.0)).execute().unwrap();
        Model::assemble(vec![solid])
    }

    #[test]
    fn empty_model_is_84_bytes() {
        let buffer = to_binary_stl(&Model::assemble(Vec::new())).unwrap();
        assert_eq!(buffer.len(), HEADER_SIZE + 4);
        assert_eq!(decode_stl_triangle_count(&buffer).unwrap(), 0);
    }

    #[test]
    fn empty_solids_write_no_records() {
        let model = Model::assemble(vec![Solid::empty(), Solid::empty()]);
        let buffer = to_binary_stl(&model).unwrap();
        assert_eq!(decode_stl_triangle_count(&buffer).unwrap(), 0);
    }

    #[test]
    fn cube_has_12_records_in_model_frame() {
        let buffer = to_binary_stl(&cube_model()).unwrap();
        assert_eq!(buffer.len(), HEADER_SIZE + 4 + 12 * TRIANGLE_SIZE);
        let triangles = read_binary_stl(&buffer).unwrap();
        assert_eq!(triangles.len(), 12);
        for tri in &triangles {
            for v in tri.vertices {
                assert!(v.iter().all(|c| c.abs() <= 1.0 + 1e-6));
            }
        }
    }

    #[test]
    fn normals_point_away_from_center_after_flip() {
        let buffer = to_binary_stl(&cube_model()).unwrap();
        for tri in read_binary_stl(&buffer).unwrap() {
            let centroid: [f32; 3] = std::array::from_fn(|k| {
                tri.vertices.iter().map(|v| v[k]).sum::<f32>() / 3.0
            });
            let dot: f32 = (0..3).map(|k| tri.normal[k] * centroid[k]).sum();
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let mut buffer = to_binary_stl(&cube_model()).unwrap();
        buffer.truncate(buffer.len() - 10);
        assert!(decode_stl_triangle_count(&buffer).is_err());
        assert!(decode_stl_triangle_count(&[0u8; 20]).is_err());
    }

    #[test]
    fn ascii_has_one_facet_per_triangle() {
        let text = to_ascii_stl(&cube_model()).unwrap();
        assert!(text.starts_with("solid sign"));
        assert!(text.trim_end().ends_with("endsolid sign"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
    }
}
