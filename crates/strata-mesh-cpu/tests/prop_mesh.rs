use proptest::prelude::*;
use strata_blocks::BlockType;
use strata_chunk::{Chunk, idx};
use strata_mesh_cpu::{MeshOptions, build_chunk_mesh};
use strata_store::WorldStore;
use strata_world::{BiomeClassifier, CHUNK_VOLUME, ChunkCoord, WorldGenParams};

fn with_voxel(store: &std::sync::Arc<WorldStore>, coord: ChunkCoord, at: (usize, usize, usize)) -> Chunk {
    let mut blocks = vec![BlockType::Air; CHUNK_VOLUME];
    blocks[idx(at.0, at.1, at.2)] = BlockType::Stone;
    Chunk::from_blocks(coord, blocks, store.source_handle())
}

#[test]
fn faces_between_loaded_chunks_are_culled() {
    let store = WorldStore::new();
    let a = store
        .insert_if_absent(with_voxel(&store, ChunkCoord::new(0, 0), (15, 5, 5)))
        .expect("a");
    assert_eq!(build_chunk_mesh(&a, MeshOptions::default()).opaque.quad_count(), 6);

    store.insert_if_absent(with_voxel(&store, ChunkCoord::new(1, 0), (0, 5, 5)));
    assert_eq!(build_chunk_mesh(&a, MeshOptions::default()).opaque.quad_count(), 5);
}

#[test]
fn faces_across_negative_boundaries_are_culled() {
    let store = WorldStore::new();
    let a = store
        .insert_if_absent(with_voxel(&store, ChunkCoord::new(0, 0), (3, 5, 0)))
        .expect("a");
    store.insert_if_absent(with_voxel(&store, ChunkCoord::new(0, -1), (3, 5, 15)));
    assert_eq!(build_chunk_mesh(&a, MeshOptions::default()).opaque.quad_count(), 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    // Buffers stay well formed on generated terrain, and remeshing is stable.
    #[test]
    fn generated_chunk_meshes_are_well_formed(cx in -200i32..200, cz in -200i32..200, debug in any::<bool>()) {
        let classifier = BiomeClassifier::new(WorldGenParams::default());
        let coord = ChunkCoord::new(cx, cz);
        let chunk = Chunk::detached(coord, strata_chunk::generate_column_blocks(coord, &classifier));
        let opts = MeshOptions { debug_colors: debug };
        let mesh = build_chunk_mesh(&chunk, opts);
        prop_assert_eq!(mesh.coord, coord);
        for buf in [&mesh.opaque, &mesh.translucent] {
            let verts = buf.vertex_count();
            prop_assert_eq!(buf.norm.len(), verts * 3);
            prop_assert_eq!(buf.uv.len(), verts * 2);
            prop_assert_eq!(buf.col.len(), verts * 4);
            prop_assert_eq!(buf.idx.len(), buf.quad_count() * 6);
            prop_assert!(buf.idx.iter().all(|&i| (i as usize) < verts));
        }
        // A detached heightmap column always exposes at least its 256 top faces.
        prop_assert!(mesh.quad_count() >= 256);
        let again = build_chunk_mesh(&chunk, opts);
        prop_assert_eq!(&again.opaque.pos, &mesh.opaque.pos);
        prop_assert_eq!(&again.opaque.col, &mesh.opaque.col);
    }
}
