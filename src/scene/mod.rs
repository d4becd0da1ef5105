//! Assembled models: solids, their materials, and the shared model frame.

mod color;
mod material;
mod model;
mod solid;

pub use color::Color;
pub use material::{ColorSettings, Material, MaterialSlot, SolidMaterials};
pub use model::{Aabb, Framing, Model};
pub use solid::{MaterialGroup, Solid, SolidId};
