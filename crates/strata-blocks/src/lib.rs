//! Block type catalog shared by generation, meshing and presentation.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod types;

pub use atlas::{ATLAS_TILES_PER_ROW, AtlasTile};
pub use types::{BlockType, FaceRole};
