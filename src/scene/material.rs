use serde::{Deserialize, Serialize};

use super::Color;

/// Physically based surface parameters for one material slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    /// Default side-wall material.
    #[must_use]
    pub fn side(color: Color) -> Self {
        Self {
            color,
            roughness: 0.5,
            metalness: 0.2,
        }
    }

    /// Default cap material.
    #[must_use]
    pub fn front(color: Color) -> Self {
        Self {
            color,
            roughness: 0.3,
            metalness: 0.1,
        }
    }
}

/// Which of a solid's two materials a triangle range uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    /// Side walls and bevels.
    Side,
    /// Front and back caps.
    Front,
}

impl MaterialSlot {
    /// Positional index used by renderers that address materials by slot
    /// number: 0 for side, 1 for front.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Side => 0,
            Self::Front => 1,
        }
    }
}

/// The two materials of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidMaterials {
    pub side: Material,
    pub front: Material,
}

impl SolidMaterials {
    #[must_use]
    pub fn get(&self, slot: MaterialSlot) -> &Material {
        match slot {
            MaterialSlot::Side => &self.side,
            MaterialSlot::Front => &self.front,
        }
    }

    /// Overwrites both colors, leaving the other material parameters alone.
    pub fn set_colors(&mut self, colors: &ColorSettings) {
        self.side.color = colors.side_color;
        self.front.color = colors.front_color;
    }
}

impl From<&ColorSettings> for SolidMaterials {
    fn from(colors: &ColorSettings) -> Self {
        Self {
            side: Material::side(colors.side_color),
            front: Material::front(colors.front_color),
        }
    }
}

impl Default for SolidMaterials {
    fn default() -> Self {
        Self::from(&ColorSettings::default())
    }
}

/// Cap and side colors applied to every solid of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSettings {
    pub front_color: Color,
    pub side_color: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            front_color: Color::WHITE,
            side_color: Color::rgb(0xcc, 0xcc, 0xcc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_indices_are_side_then_front() {
        assert_eq!(MaterialSlot::Side.index(), 0);
        assert_eq!(MaterialSlot::Front.index(), 1);
    }

    #[test]
    fn set_colors_keeps_surface_parameters() {
        let mut materials = SolidMaterials::default();
        let colors = ColorSettings {
            front_color: Color::rgb(1, 2, 3),
            side_color: Color::BLACK,
        };
        materials.set_colors(&colors);
        assert_eq!(materials.get(MaterialSlot::Front).color, Color::rgb(1, 2, 3));
        assert_eq!(materials.side.color, Color::BLACK);
        assert!((materials.side.roughness - 0.5).abs() < f32::EPSILON);
        assert!((materials.front.metalness - 0.1).abs() < f32::EPSILON);
    }
}
