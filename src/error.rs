use thiserror::Error;

/// Top-level error type for the sign pipeline.
#[derive(Debug, Error)]
pub enum SignError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors caused by the outline or settings handed to the pipeline.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("outline contains no paths")]
    EmptyOutline,

    #[error("malformed path data at byte {position}: {message}")]
    MalformedPath { position: usize, message: String },

    #[error("invalid outline: {0}")]
    InvalidOutline(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors raised while exporting a model or outline.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NothingToExport,

    #[error("invalid mesh buffer: expected {expected} bytes, got {got}")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SignError {
    /// Returns `true` when the failure means there was no design to export.
    #[must_use]
    pub fn is_nothing_to_export(&self) -> bool {
        matches!(self, Self::Export(ExportError::NothingToExport))
    }
}

/// Convenience type alias for results using [`SignError`].
pub type Result<T> = std::result::Result<T, SignError>;
