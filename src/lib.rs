pub mod error;
pub mod export;
pub mod math;
pub mod operations;
pub mod outline;
pub mod scene;
pub mod settings;
pub mod shape;
pub mod studio;
pub mod tessellation;

pub use error::{Result, SignError};
pub use outline::{Outline, OutlineBounds, PathRecord};
pub use scene::{Color, ColorSettings, Model};
pub use settings::SignSettings;
pub use studio::{generate_model, SignStudio};
