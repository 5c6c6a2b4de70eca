use proptest::prelude::*;
use strata_world::worldgen::DEFAULT_SEED;
use strata_world::{Biome, BiomeClassifier, CHUNK_HEIGHT, ChunkCoord, WorldGenParams, split_axis};

fn coord() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Two independently built classifiers agree bit-for-bit.
    #[test]
    fn classify_and_height_are_pure(x in coord(), z in coord()) {
        let a = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED));
        let b = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED));
        prop_assert_eq!(a.classify(x, z), b.classify(x, z));
        prop_assert_eq!(a.height_at(x, z).to_bits(), b.height_at(x, z).to_bits());
        prop_assert_eq!(a.classify(x, z), a.classify(x, z));
    }

    // Column heights always leave room for at least one solid and one air block.
    #[test]
    fn solid_height_in_world_bounds(x in coord(), z in coord()) {
        let c = BiomeClassifier::new(WorldGenParams::default());
        let col = c.sample_column(x, z);
        prop_assert!(col.solid_height >= 1);
        prop_assert!(col.solid_height < CHUNK_HEIGHT as i32);
        prop_assert!(col.height.is_finite());
    }

    // split_axis reassembles to the original coordinate.
    #[test]
    fn split_axis_roundtrip(w in coord()) {
        let (c, l) = split_axis(w);
        prop_assert!(l < 16);
        prop_assert_eq!(c * 16 + l as i32, w);
        prop_assert_eq!(ChunkCoord::from_block(w, w), ChunkCoord::new(c, c));
    }
}

#[test]
fn changing_the_seed_changes_the_distribution() {
    let a = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED));
    let b = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED + 1));
    let mut differing = 0;
    let mut total = 0;
    for i in -32..32 {
        for j in -32..32 {
            let (x, z) = (i * 97, j * 89);
            total += 1;
            if a.classify(x, z) != b.classify(x, z) {
                differing += 1;
            }
        }
    }
    assert!(differing > 0, "{differing}/{total} columns differ");
}

// At the origin every OpenSimplex2 octave is exactly zero, so continental
// is 0 and the ridged field peaks at 1, which clears any mountain threshold.
#[test]
fn golden_origin_is_mountains() {
    for _ in 0..4 {
        let c = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED));
        assert_eq!(c.classify(0, 0), Biome::Mountains);
    }
    assert_eq!(BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED + 7)).classify(0, 0), Biome::Mountains);
}

#[test]
fn golden_columns_with_default_seed() {
    let c = BiomeClassifier::new(WorldGenParams::with_seed(DEFAULT_SEED));
    assert_eq!(c.classify(-256, -1280), Biome::Forest);
    assert_eq!(c.classify(1024, 3072), Biome::Desert);
    assert_eq!(c.classify(-1280, 4096), Biome::Tundra);
}

#[test]
fn large_area_produces_several_biomes() {
    let c = BiomeClassifier::new(WorldGenParams::default());
    let mut seen = std::collections::HashSet::new();
    for i in -40..40 {
        for j in -40..40 {
            seen.insert(c.classify(i * 211, j * 197));
        }
    }
    assert!(seen.len() >= 3, "only saw {seen:?}");
}
