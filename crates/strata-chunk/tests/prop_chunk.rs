use proptest::prelude::*;
use strata_blocks::BlockType;
use strata_chunk::{Chunk, generate_column_blocks, idx};
use strata_world::{BiomeClassifier, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, WorldGenParams};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Every column holds exactly solid_height solid blocks below air, plus optional water up to sea level.
    #[test]
    fn generated_columns_match_samples(cx in -5000i32..5000, cz in -5000i32..5000, x in 0usize..16, z in 0usize..16) {
        let classifier = BiomeClassifier::new(WorldGenParams::default());
        let coord = ChunkCoord::new(cx, cz);
        let blocks = generate_column_blocks(coord, &classifier);
        prop_assert_eq!(blocks.len(), CHUNK_VOLUME);
        let (ox, _, oz) = coord.world_origin();
        let col = classifier.sample_column(ox + x as i32, oz + z as i32);
        let top = col.solid_height as usize;
        for y in 0..top {
            let b = blocks[idx(x, y, z)];
            prop_assert!(b.is_opaque(), "y={} b={:?}", y, b);
        }
        prop_assert_eq!(blocks[idx(x, top - 1, z)], col.surface);
        let sea = classifier.sea_level() as usize;
        for y in top..CHUNK_HEIGHT {
            let b = blocks[idx(x, y, z)];
            if col.water && y <= sea {
                prop_assert_eq!(b, BlockType::Water);
            } else {
                prop_assert_eq!(b, BlockType::Air);
            }
        }
    }

    #[test]
    fn idx_is_a_bijection(x in 0usize..CHUNK_SIZE, y in 0usize..CHUNK_HEIGHT, z in 0usize..CHUNK_SIZE) {
        let i = idx(x, y, z);
        prop_assert!(i < CHUNK_VOLUME);
        prop_assert_eq!(i % CHUNK_SIZE, x);
        prop_assert_eq!((i / CHUNK_SIZE) % CHUNK_HEIGHT, y);
        prop_assert_eq!(i / (CHUNK_SIZE * CHUNK_HEIGHT), z);
    }
}

#[test]
fn generation_is_deterministic() {
    let a = BiomeClassifier::new(WorldGenParams::default());
    let b = BiomeClassifier::new(WorldGenParams::default());
    let coord = ChunkCoord::new(-3, 7);
    assert_eq!(generate_column_blocks(coord, &a), generate_column_blocks(coord, &b));
}

#[test]
fn detached_chunk_sees_air_across_edges() {
    let classifier = BiomeClassifier::new(WorldGenParams::default());
    let coord = ChunkCoord::new(0, 0);
    let chunk = Chunk::detached(coord, generate_column_blocks(coord, &classifier));
    assert!(!chunk.is_air(0, 0, 0));
    assert!(chunk.is_air(-1, 0, 0));
    assert!(chunk.is_air(0, 0, 16));
    assert_eq!(chunk.snapshot().len(), CHUNK_VOLUME);
    assert!(!chunk.is_dirty());
}
