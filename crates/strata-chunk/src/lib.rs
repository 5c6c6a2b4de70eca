//! Chunk columns: voxel storage, terrain fill and change tracking.
#![forbid(unsafe_code)]

mod chunk;
mod terrain;

pub use chunk::{BlockSource, Chunk, idx};
pub use terrain::generate_column_blocks;
