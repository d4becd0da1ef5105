//! Serializers for finished designs: STL meshes and SVG outlines.

pub mod stl;
pub mod svg;

pub use stl::{
    decode_stl_triangle_count, read_binary_stl, to_ascii_stl, to_binary_stl, write_ascii_stl,
    write_binary_stl, StlTriangle,
};
pub use svg::{to_svg, SvgExportOptions};
