//! World sizing, coherent noise, biome classification and worldgen parameters.
#![forbid(unsafe_code)]

pub mod biome;
mod chunk_coord;
mod error;
pub mod noise;
pub mod worldgen;

pub use biome::{Biome, BiomeClassifier, ClimateSample, ColumnSample};
pub use chunk_coord::ChunkCoord;
pub use error::WorldGenError;
pub use noise::{FractalMode, NoiseConfig, NoiseField, NoiseSettings};
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};

/// Horizontal side length of a chunk column, in blocks.
pub const CHUNK_SIZE: usize = 16;
/// Vertical extent of every chunk column; world y lives in `[0, CHUNK_HEIGHT)`.
pub const CHUNK_HEIGHT: usize = 256;
/// Voxels held by one chunk column.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_HEIGHT * CHUNK_SIZE;

/// Splits a world block coordinate into `(chunk, local)` along one horizontal axis.
#[inline]
pub fn split_axis(w: i32) -> (i32, usize) {
    let s = CHUNK_SIZE as i32;
    (w.div_euclid(s), w.rem_euclid(s) as usize)
}

#[inline]
pub fn y_in_bounds(y: i32) -> bool {
    y >= 0 && (y as usize) < CHUNK_HEIGHT
}
