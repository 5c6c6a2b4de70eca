use proptest::prelude::*;
use strata_runtime::Spiral;
use strata_world::ChunkCoord;

proptest! {
    #[test]
    fn spiral_covers_the_square_exactly(cx in -10_000i32..10_000, cz in -10_000i32..10_000, r in 0i32..12) {
        let center = ChunkCoord::new(cx, cz);
        let mut cells: Vec<ChunkCoord> = Spiral::new(center, r).collect();
        prop_assert_eq!(cells.len(), Spiral::cell_count(r));
        let distances: Vec<i32> = cells.iter().map(|c| c.chebyshev_distance(center)).collect();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        cells.sort();
        cells.dedup();
        prop_assert_eq!(cells.len(), Spiral::cell_count(r));
        prop_assert!(cells.iter().all(|c| c.chebyshev_distance(center) <= r));
    }
}
