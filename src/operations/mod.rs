mod extrude;

pub use extrude::{
    effective_depth, BevelSettings, Extrude, ExtrusionSettings, MAX_BEVEL_SEGMENTS,
};
