//! The pipeline entry point and the controller that owns the live model.

use tracing::{debug, info};

use crate::error::{ExportError, InputError, Result};
use crate::export::{to_ascii_stl, to_binary_stl, to_svg, SvgExportOptions};
use crate::operations::Extrude;
use crate::outline::Outline;
use crate::scene::{ColorSettings, Model};
use crate::settings::SignSettings;
use crate::shape::normalize_outline;

/// Builds a colored, centered model from an outline.
///
/// Malformed records and degenerate shapes are logged and skipped; they never
/// stop the remaining records from being extruded.
///
/// # Errors
///
/// Returns [`InputError::EmptyOutline`] for an outline with no paths,
/// [`InputError::InvalidSettings`] if the settings fail validation, or
/// [`InputError::InvalidOutline`] if dynamic depth resolves to a non-finite
/// value.
pub fn generate_model(outline: &Outline, settings: &SignSettings) -> Result<Model> {
    if outline.is_empty() {
        return Err(InputError::EmptyOutline.into());
    }
    settings.validate()?;

    let normalized = normalize_outline(outline, &settings.flatten_params()?);
    let height = outline
        .bounds
        .map(|b| b.height())
        .or_else(|| normalized.bounds.map(|(min, max)| max.y - min.y));
    let extrusion = settings.extrusion(height);
    if !extrusion.depth.is_finite() {
        return Err(InputError::InvalidOutline(format!(
            "outline height gives a non-finite extrusion depth ({})",
            extrusion.depth
        ))
        .into());
    }
    debug!(
        depth = extrusion.depth,
        shapes = normalized.shape_count(),
        failed_records = normalized.failures.len(),
        "extruding outline"
    );

    let solids = normalized
        .shapes()
        .map(|shape| Extrude::new(shape, extrusion).execute())
        .collect::<Result<Vec<_>>>()?;

    let mut model = Model::assemble(solids);
    model.apply_colors(&settings.colors());
    Ok(model)
}

/// Application state for one sign editor: the current outline, settings,
/// and the model shown by the preview.
///
/// The model is replaced as a whole on every regeneration, so a reader never
/// sees a partially built one.
#[derive(Debug, Default)]
pub struct SignStudio {
    outline: Option<Outline>,
    settings: SignSettings,
    model: Option<Model>,
}

impl SignStudio {
    /// Creates a studio with no design.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidSettings`] if the settings fail validation.
    pub fn new(settings: SignSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            outline: None,
            settings,
            model: None,
        })
    }

    /// The model for the preview, if a design is loaded.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &SignSettings {
        &self.settings
    }

    /// Replaces the design and rebuilds the model.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyOutline`] for an outline with no paths; the
    /// previous design and model are cleared in that case.
    pub fn regenerate(&mut self, outline: Outline) -> Result<&Model> {
        if outline.is_empty() {
            self.outline = None;
            self.model = None;
            return Err(InputError::EmptyOutline.into());
        }
        self.outline = Some(outline);
        self.rebuild()
    }

    fn rebuild(&mut self) -> Result<&Model> {
        let Some(outline) = &self.outline else {
            self.model = None;
            return Err(InputError::EmptyOutline.into());
        };
        match generate_model(outline, &self.settings) {
            Ok(model) => {
                info!(
                    solids = model.len(),
                    triangles = model.triangle_count(),
                    "regenerated sign"
                );
                let model: &Model = self.model.insert(model);
                Ok(model)
            }
            Err(error) => {
                self.model = None;
                Err(error)
            }
        }
    }

    /// Applies new settings, rebuilding geometry only when a geometry field
    /// changed and recoloring in place otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidSettings`] and keeps the current settings
    /// if the new ones fail validation.
    pub fn update_settings(&mut self, settings: SignSettings) -> Result<()> {
        settings.validate()?;
        let rebuild = self.settings.is_geometry_change(&settings);
        self.settings = settings;
        if rebuild && self.outline.is_some() {
            self.rebuild()?;
        } else {
            let colors = self.settings.colors();
            self.set_colors(colors);
        }
        Ok(())
    }

    /// Recolors the current model without touching its geometry.
    pub fn set_colors(&mut self, colors: ColorSettings) {
        self.settings.front_color = colors.front_color;
        self.settings.side_color = colors.side_color;
        if let Some(model) = &mut self.model {
            model.apply_colors(&colors);
        }
    }

    /// Exports the current model as binary STL.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NothingToExport`] when no model exists.
    pub fn export_stl(&self) -> Result<Vec<u8>> {
        to_binary_stl(self.require_model()?)
    }

    /// Exports the current model as ASCII STL.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NothingToExport`] when no model exists.
    pub fn export_stl_ascii(&self) -> Result<String> {
        to_ascii_stl(self.require_model()?)
    }

    /// Exports the current outline as SVG.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NothingToExport`] when no outline is loaded.
    pub fn export_svg(&self, options: &SvgExportOptions) -> Result<String> {
        let outline = self.outline.as_ref().ok_or(ExportError::NothingToExport)?;
        to_svg(outline, options)
    }

    fn require_model(&self) -> Result<&Model> {
        self.model
            .as_ref()
            .ok_or_else(|| ExportError::NothingToExport.into())
    }
}
