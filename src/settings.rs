//! User-facing sign settings.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::operations::{
    effective_depth, BevelSettings, ExtrusionSettings, MAX_BEVEL_SEGMENTS,
};
use crate::outline::FlattenParams;
use crate::scene::{Color, ColorSettings};

/// Extrusion, bevel, and color settings for a sign, in the JSON shape the
/// host's settings panel produces. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignSettings {
    pub extrusion_depth: f64,
    /// Derive the depth from the outline height instead of `extrusion_depth`.
    pub dynamic_depth: bool,
    pub bevel_enabled: bool,
    pub bevel_thickness: f64,
    pub bevel_size: f64,
    pub bevel_segments: u32,
    pub front_color: Color,
    pub side_color: Color,
    /// Maximum chord deviation when flattening curves.
    pub curve_tolerance: f64,
}

impl Default for SignSettings {
    fn default() -> Self {
        Self {
            extrusion_depth: 20.0,
            dynamic_depth: false,
            bevel_enabled: true,
            bevel_thickness: 1.0,
            bevel_size: 0.5,
            bevel_segments: 3,
            front_color: Color::WHITE,
            side_color: Color::rgb(0xcc, 0xcc, 0xcc),
            curve_tolerance: 0.05,
        }
    }
}

impl SignSettings {
    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidSettings`] for malformed JSON, colors that
    /// are not CSS hex, or values rejected by [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| InputError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidSettings`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> {
            Err(InputError::InvalidSettings(msg.to_owned()).into())
        };
        if !self.extrusion_depth.is_finite() || self.extrusion_depth <= 0.0 {
            return invalid("extrusionDepth must be a positive number");
        }
        if !self.bevel_thickness.is_finite() || self.bevel_thickness < 0.0 {
            return invalid("bevelThickness must be zero or positive");
        }
        if !self.bevel_size.is_finite() || self.bevel_size < 0.0 {
            return invalid("bevelSize must be zero or positive");
        }
        if self.bevel_segments > MAX_BEVEL_SEGMENTS {
            return invalid(&format!("bevelSegments must be at most {MAX_BEVEL_SEGMENTS}"));
        }
        if !self.curve_tolerance.is_finite() || self.curve_tolerance <= 0.0 {
            return invalid("curveTolerance must be a positive number");
        }
        Ok(())
    }

    /// Resolves the extrusion for an outline of the given height.
    #[must_use]
    pub fn extrusion(&self, outline_height: Option<f64>) -> ExtrusionSettings {
        let depth = effective_depth(self.extrusion_depth, self.dynamic_depth, outline_height);
        let settings = ExtrusionSettings::new(depth);
        if self.bevel_enabled {
            settings.with_bevel(BevelSettings {
                thickness: self.bevel_thickness,
                size: self.bevel_size,
                segments: self.bevel_segments,
            })
        } else {
            settings
        }
    }

    /// Curve flattening parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `curve_tolerance` is not positive.
    pub fn flatten_params(&self) -> Result<FlattenParams> {
        FlattenParams::with_tolerance(self.curve_tolerance)
    }

    #[must_use]
    pub fn colors(&self) -> ColorSettings {
        ColorSettings {
            front_color: self.front_color,
            side_color: self.side_color,
        }
    }

    /// Returns `true` if switching to `other` requires rebuilding geometry
    /// rather than just recoloring.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_geometry_change(&self, other: &Self) -> bool {
        self.extrusion_depth != other.extrusion_depth
            || self.dynamic_depth != other.dynamic_depth
            || self.bevel_enabled != other.bevel_enabled
            || self.bevel_thickness != other.bevel_thickness
            || self.bevel_size != other.bevel_size
            || self.bevel_segments != other.bevel_segments
            || self.curve_tolerance != other.curve_tolerance
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_settings_contract() {
        let json = r##"{
            "extrusionDepth": 20, "dynamicDepth": false, "bevelEnabled": false,
            "bevelThickness": 0, "bevelSize": 0, "bevelSegments": 0,
            "frontColor": "#ffffff", "sideColor": "#000000"
        }"##;
        let settings = SignSettings::from_json(json).unwrap();
        assert!(!settings.bevel_enabled);
        assert_eq!(settings.side_color, Color::BLACK);
        assert_relative_eq!(settings.curve_tolerance, 0.05);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = SignSettings::from_json("{}").unwrap();
        assert_eq!(settings, SignSettings::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(SignSettings::from_json(r#"{"extrusionDepth": 0}"#).is_err());
        assert!(SignSettings::from_json(r#"{"bevelSize": -1}"#).is_err());
        assert!(SignSettings::from_json(r#"{"bevelSegments": -1}"#).is_err());
        assert!(SignSettings::from_json(r#"{"bevelSegments": 4294967295}"#).is_err());
        assert!(SignSettings::from_json(r#"{"bevelSegments": 64}"#).is_ok());
        assert!(SignSettings::from_json(r#"{"frontColor": "white"}"#).is_err());
    }

    #[test]
    fn extrusion_resolves_dynamic_depth_and_bevel() {
        let settings = SignSettings {
            dynamic_depth: true,
            ..SignSettings::default()
        };
        let extrusion = settings.extrusion(Some(40.0));
        assert_relative_eq!(extrusion.depth, 10.0);
        assert_eq!(extrusion.bevel.unwrap().segments, 3);

        let plain = SignSettings {
            bevel_enabled: false,
            ..SignSettings::default()
        };
        assert!(plain.extrusion(None).bevel.is_none());
    }

    #[test]
    fn color_changes_are_not_geometry_changes() {
        let base = SignSettings::default();
        let recolored = SignSettings {
            front_color: Color::BLACK,
            ..base.clone()
        };
        let deeper = SignSettings {
            extrusion_depth: 30.0,
            ..base.clone()
        };
        assert!(!base.is_geometry_change(&recolored));
        assert!(base.is_geometry_change(&deeper));
    }
}
