//! Input outlines: the 2D path records handed over by glyph shaping or a
//! parsed vector file, plus the path-data grammar and curve flattening.

pub mod flatten;
pub mod path_data;

pub use flatten::{flatten_commands, FlattenParams};
pub use path_data::{parse_path_data, PathCommand};

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Axis-aligned extent of an outline in authoring coordinates (Y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineBounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl OutlineBounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// One drawn path of an outline with its paint attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRecord {
    /// Path-data drawing commands.
    pub path: String,
    #[serde(default = "default_paint")]
    pub fill: String,
    #[serde(default = "default_paint")]
    pub stroke: String,
    #[serde(default)]
    pub stroke_width: f64,
}

fn default_paint() -> String {
    "#000000".to_owned()
}

impl PathRecord {
    /// Creates a record with black fill and stroke and no stroke width.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fill: default_paint(),
            stroke: default_paint(),
            stroke_width: 0.0,
        }
    }

    /// Sets the paint attributes.
    #[must_use]
    pub fn with_paint(mut self, fill: &str, stroke: &str, stroke_width: f64) -> Self {
        self.fill = fill.to_owned();
        self.stroke = stroke.to_owned();
        self.stroke_width = stroke_width;
        self
    }

    /// Parses the record's drawing commands.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MalformedPath`] if the path data is malformed.
    pub fn commands(&self) -> Result<Vec<PathCommand>> {
        parse_path_data(&self.path)
    }
}

/// An ordered set of path records describing a design's silhouette.
///
/// An outline with no paths is the "no design" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub paths: Vec<PathRecord>,
    #[serde(default)]
    pub bounds: Option<OutlineBounds>,
}

impl Outline {
    /// Creates an outline from records and optional bounds.
    #[must_use]
    pub fn new(paths: Vec<PathRecord>, bounds: Option<OutlineBounds>) -> Self {
        Self { paths, bounds }
    }

    /// Parses an outline from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidOutline`] if the JSON does not match the
    /// outline contract.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| InputError::InvalidOutline(e.to_string()).into())
    }

    /// Returns `true` when the outline carries no design.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_contract_json() {
        let json = r##"{
            "paths": [{"path": "M0 0 L10 0 L10 10 Z", "fill": "#000", "stroke": "#111", "strokeWidth": 20}],
            "bounds": {"x1": 0, "y1": 0, "x2": 10, "y2": 10}
        }"##;
        let outline = Outline::from_json(json).unwrap();
        assert_eq!(outline.paths.len(), 1);
        assert_eq!(outline.paths[0].stroke, "#111");
        assert!((outline.paths[0].stroke_width - 20.0).abs() < f64::EPSILON);
        assert!((outline.bounds.unwrap().height() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_bounds_and_missing_paint_are_accepted() {
        let json = r#"{"paths": [{"path": "M0 0 L1 0 L1 1 Z"}], "bounds": null}"#;
        let outline = Outline::from_json(json).unwrap();
        assert!(outline.bounds.is_none());
        assert_eq!(outline.paths[0].fill, "#000000");
    }

    #[test]
    fn empty_paths_is_empty() {
        let outline = Outline::from_json(r#"{"paths": []}"#).unwrap();
        assert!(outline.is_empty());
    }

    #[test]
    fn bad_json_is_an_input_error() {
        assert!(Outline::from_json("{").is_err());
    }
}
