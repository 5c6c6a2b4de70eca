use strata_blocks::BlockType;
use strata_world::{BiomeClassifier, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord};

use crate::chunk::idx;

/// Fills a full chunk column from the classifier, one `sample_column` per `(x, z)`.
///
/// Layers from the bottom: stone, filler, one surface block, then water up to
/// sea level where the column is locally wet.
pub fn generate_column_blocks(coord: ChunkCoord, classifier: &BiomeClassifier) -> Vec<BlockType> {
    let mut blocks = vec![BlockType::Air; CHUNK_VOLUME];
    let (base_x, _, base_z) = coord.world_origin();
    let filler_depth = classifier.params().terrain.filler_depth.max(0);
    let water_top = classifier.sea_level().min(CHUNK_HEIGHT as i32 - 1);
    for z in 0..CHUNK_SIZE {
        for x in 0..CHUNK_SIZE {
            let wx = base_x + x as i32;
            let wz = base_z + z as i32;
            let col = classifier.sample_column(wx, wz);
            let top = col.solid_height - 1;
            for y in 0..col.solid_height {
                let block = if y == top {
                    col.surface
                } else if y >= top - filler_depth {
                    col.filler
                } else {
                    BlockType::Stone
                };
                blocks[idx(x, y as usize, z)] = block;
            }
            if col.water {
                for y in col.solid_height..=water_top {
                    blocks[idx(x, y as usize, z)] = BlockType::Water;
                }
            }
        }
    }
    blocks
}
