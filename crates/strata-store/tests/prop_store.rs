use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use strata_blocks::BlockType;
use strata_chunk::Chunk;
use strata_store::{VoxelObserver, WorldStore};
use strata_world::{CHUNK_HEIGHT, ChunkCoord};

fn store_with_3x3() -> Arc<WorldStore> {
    let store = WorldStore::new();
    for cz in -1..=1 {
        for cx in -1..=1 {
            let chunk = Chunk::from_blocks(ChunkCoord::new(cx, cz), Vec::new(), store.source_handle());
            store.insert_if_absent(chunk);
        }
    }
    store
}

fn dirty_set(store: &WorldStore) -> Vec<ChunkCoord> {
    let mut v: Vec<ChunkCoord> = store.dirty_chunks().iter().map(|c| c.coord()).collect();
    v.sort();
    v
}

fn sorted(mut v: Vec<ChunkCoord>) -> Vec<ChunkCoord> {
    v.sort();
    v
}

#[test]
fn interior_edit_dirties_only_its_own_chunk() {
    let store = store_with_3x3();
    assert!(store.set_block(7, 40, 7, BlockType::Stone));
    assert_eq!(dirty_set(&store), vec![ChunkCoord::new(0, 0)]);
}

#[test]
fn left_edge_dirties_left_neighbor() {
    let store = store_with_3x3();
    store.set_block(0, 40, 7, BlockType::Stone);
    assert_eq!(dirty_set(&store), sorted(vec![ChunkCoord::new(0, 0), ChunkCoord::new(-1, 0)]));
}

#[test]
fn right_edge_dirties_right_neighbor() {
    let store = store_with_3x3();
    store.set_block(15, 40, 7, BlockType::Stone);
    assert_eq!(dirty_set(&store), sorted(vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]));
}

#[test]
fn back_edge_dirties_back_neighbor() {
    let store = store_with_3x3();
    store.set_block(7, 40, 0, BlockType::Stone);
    assert_eq!(dirty_set(&store), sorted(vec![ChunkCoord::new(0, 0), ChunkCoord::new(0, -1)]));
}

#[test]
fn front_edge_dirties_front_neighbor() {
    let store = store_with_3x3();
    store.set_block(7, 40, 15, BlockType::Stone);
    assert_eq!(dirty_set(&store), sorted(vec![ChunkCoord::new(0, 0), ChunkCoord::new(0, 1)]));
}

#[test]
fn negative_world_edge_maps_to_the_correct_chunk() {
    let store = store_with_3x3();
    // x = -1 is local 15 of chunk -1, which borders chunk 0.
    store.set_block(-1, 40, 7, BlockType::Stone);
    assert_eq!(dirty_set(&store), sorted(vec![ChunkCoord::new(-1, 0), ChunkCoord::new(0, 0)]));
}

#[test]
fn writes_outside_loaded_space_are_ignored() {
    let store = store_with_3x3();
    assert!(!store.set_block(100, 40, 0, BlockType::Stone));
    assert!(!store.set_block(0, -1, 0, BlockType::Stone));
    assert!(!store.set_block(0, CHUNK_HEIGHT as i32, 0, BlockType::Stone));
    assert!(dirty_set(&store).is_empty());
    assert_eq!(store.get_block(100, 40, 0), BlockType::Air);
}

#[derive(Default)]
struct Recorder(Mutex<Vec<(i32, i32, i32, BlockType)>>);

impl VoxelObserver for Recorder {
    fn voxel_changed(&self, wx: i32, wy: i32, wz: i32, block: BlockType) {
        self.0.lock().push((wx, wy, wz, block));
    }
}

#[test]
fn observers_see_effective_writes() {
    let store = store_with_3x3();
    let rec = Arc::new(Recorder::default());
    store.add_observer(rec.clone());
    store.set_block(3, 10, -4, BlockType::Sand);
    store.set_block(3, 10, -4, BlockType::Sand);
    store.set_block(300, 10, -4, BlockType::Sand);
    assert_eq!(rec.0.lock().as_slice(), &[(3, 10, -4, BlockType::Sand)]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn set_then_get_roundtrips(x in -16i32..32, y in 0i32..CHUNK_HEIGHT as i32, z in -16i32..32, id in 1u8..=8) {
        let store = store_with_3x3();
        let block = BlockType::from_id(id);
        store.set_block(x, y, z, block);
        prop_assert_eq!(store.get_block(x, y, z), block);
    }

    #[test]
    fn unloaded_chunks_read_as_air(x in -1_000_000i32..1_000_000, y in -50i32..300, z in 48i32..1_000_000) {
        let store = store_with_3x3();
        store.set_block(x, y, z, BlockType::Stone);
        prop_assert_eq!(store.get_block(x, y, z), BlockType::Air);
    }
}
