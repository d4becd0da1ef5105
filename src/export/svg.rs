//! SVG export of the 2D outline.

use std::fmt::Write as _;

use crate::error::{ExportError, Result};
use crate::outline::{FlattenParams, Outline, OutlineBounds};
use crate::scene::Color;
use crate::shape::normalize_outline;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Options for [`to_svg`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgExportOptions {
    /// Paint every path's stroke with this color and width instead of its own.
    pub stroke_override: Option<(Color, f64)>,
}

/// Renders the outline as a standalone SVG document, one `<path>` per record.
///
/// The document is sized to the outline bounds. Without bounds, the extent of
/// the flattened contours is used; if nothing can be flattened the size
/// attributes are left out.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] for an outline with no paths.
pub fn to_svg(outline: &Outline, options: &SvgExportOptions) -> Result<String> {
    if outline.is_empty() {
        return Err(ExportError::NothingToExport.into());
    }

    let mut doc = String::new();
    let _ = write!(doc, r#"<svg xmlns="{SVG_NAMESPACE}""#);
    if let Some(b) = document_bounds(outline) {
        let _ = write!(
            doc,
            r#" width="{}" height="{}" viewBox="{} {} {} {}""#,
            b.width(),
            b.height(),
            b.x1,
            b.y1,
            b.width(),
            b.height()
        );
    }
    doc.push_str(">\n");

    for record in &outline.paths {
        let (stroke, stroke_width) = match options.stroke_override {
            Some((color, width)) => (color.to_string(), width),
            None => (record.stroke.clone(), record.stroke_width),
        };
        let _ = writeln!(
            doc,
            r#"  <path d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            escape_attr(&record.path),
            escape_attr(&record.fill),
            escape_attr(&stroke),
            stroke_width
        );
    }

    doc.push_str("</svg>\n");
    Ok(doc)
}

fn document_bounds(outline: &Outline) -> Option<OutlineBounds> {
    outline.bounds.or_else(|| {
        let (min, max) = normalize_outline(outline, &FlattenParams::default()).bounds?;
        Some(OutlineBounds::new(min.x, min.y, max.x, max.y))
    })
}

/// Escapes a string for use inside a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
