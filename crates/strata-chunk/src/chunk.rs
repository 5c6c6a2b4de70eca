use std::fmt;
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use strata_blocks::BlockType;
use strata_world::{BiomeClassifier, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, y_in_bounds};

use crate::terrain::generate_column_blocks;

/// Read access to world blocks by world coordinate.
///
/// Implemented by the world store; chunks hold it weakly to resolve faces
/// that border a different chunk.
pub trait BlockSource: Send + Sync {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType;
}

struct Detached;

impl BlockSource for Detached {
    fn block_at(&self, _wx: i32, _wy: i32, _wz: i32) -> BlockType {
        BlockType::Air
    }
}

/// Linear index of local `(x, y, z)`. X varies fastest, then y, then z, which
/// matches the layout of a 3D texture region so snapshots copy row by row.
#[inline]
pub const fn idx(x: usize, y: usize, z: usize) -> usize {
    (z * CHUNK_HEIGHT + y) * CHUNK_SIZE + x
}

#[inline]
fn local_in_bounds(x: usize, y: usize, z: usize) -> bool {
    x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE
}

pub struct Chunk {
    coord: ChunkCoord,
    voxels: RwLock<Box<[BlockType]>>,
    dirty: AtomicBool,
    mesh_pending: AtomicBool,
    mesh_gen: AtomicU64,
    source: Weak<dyn BlockSource>,
}

impl Chunk {
    /// Generates terrain synchronously. The chunk is complete when this returns.
    pub fn generate(coord: ChunkCoord, classifier: &BiomeClassifier, source: Weak<dyn BlockSource>) -> Self {
        let blocks = generate_column_blocks(coord, classifier);
        Self::from_blocks(coord, blocks, source)
    }

    /// Wraps existing voxel data; wrong-length input is truncated or padded with air.
    pub fn from_blocks(coord: ChunkCoord, blocks: Vec<BlockType>, source: Weak<dyn BlockSource>) -> Self {
        let mut b = blocks;
        if b.len() != CHUNK_VOLUME {
            b.resize(CHUNK_VOLUME, BlockType::Air);
        }
        Self {
            coord,
            voxels: RwLock::new(b.into_boxed_slice()),
            dirty: AtomicBool::new(false),
            mesh_pending: AtomicBool::new(false),
            mesh_gen: AtomicU64::new(0),
            source,
        }
    }

    /// A chunk with no world behind it; every cross-boundary query sees air.
    pub fn detached(coord: ChunkCoord, blocks: Vec<BlockType>) -> Self {
        let source: Weak<dyn BlockSource> = Weak::<Detached>::new();
        Self::from_blocks(coord, blocks, source)
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn world_origin(&self) -> (i32, i32, i32) {
        self.coord.world_origin()
    }

    /// Out-of-range local coordinates read as air.
    #[inline]
    pub fn block_local(&self, x: usize, y: usize, z: usize) -> BlockType {
        if !local_in_bounds(x, y, z) {
            return BlockType::Air;
        }
        self.voxels.read()[idx(x, y, z)]
    }

    /// Writes one voxel. Returns whether the stored value changed.
    /// Dirty tracking is the caller's job (the store marks this and neighbor chunks).
    pub fn set_local(&self, x: usize, y: usize, z: usize, block: BlockType) -> bool {
        if !local_in_bounds(x, y, z) {
            return false;
        }
        let mut voxels = self.voxels.write();
        let slot = &mut voxels[idx(x, y, z)];
        if *slot == block {
            return false;
        }
        *slot = block;
        true
    }

    /// Block seen from this chunk at local offset `(lx, ly, lz)`, which may lie
    /// one step outside the chunk. Positions outside the column are resolved
    /// through the world by world coordinate; vertical overflow is air.
    pub fn neighbor_block(&self, lx: i32, ly: i32, lz: i32) -> BlockType {
        if !y_in_bounds(ly) {
            return BlockType::Air;
        }
        let s = CHUNK_SIZE as i32;
        if (0..s).contains(&lx) && (0..s).contains(&lz) {
            return self.block_local(lx as usize, ly as usize, lz as usize);
        }
        let (bx, _, bz) = self.world_origin();
        self.block_world(bx + lx, ly, bz + lz)
    }

    #[inline]
    pub fn is_air(&self, lx: i32, ly: i32, lz: i32) -> bool {
        self.neighbor_block(lx, ly, lz).is_air()
    }

    /// World lookup through the back-reference. A dropped world reads as air.
    pub fn block_world(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        match self.source.upgrade() {
            Some(source) => source.block_at(wx, wy, wz),
            None => BlockType::Air,
        }
    }

    /// Copy of the voxel grid in `idx` order.
    pub fn snapshot(&self) -> Vec<BlockType> {
        self.voxels.read().to_vec()
    }

    pub fn count_non_air(&self) -> usize {
        self.voxels.read().iter().filter(|b| !b.is_air()).count()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Claims the mesh-request slot; false if a request is already queued.
    #[inline]
    pub fn try_mark_mesh_pending(&self) -> bool {
        !self.mesh_pending.swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_mesh_pending(&self) -> bool {
        self.mesh_pending.load(Ordering::Acquire)
    }

    /// Called by a mesh job right before it reads voxels. Edits landing after
    /// this point re-dirty the chunk and get picked up by the next sweep.
    ///
    /// Returns the job's mesh generation. A later job always gets a higher
    /// one, so results that finish out of order can be told apart.
    pub fn begin_mesh(&self) -> u64 {
        let generation = self.mesh_gen.fetch_add(1, Ordering::AcqRel) + 1;
        self.mesh_pending.store(false, Ordering::Release);
        self.dirty.store(false, Ordering::Release);
        generation
    }

    /// Generation handed to the most recently started mesh job; 0 if none.
    #[inline]
    pub fn mesh_generation(&self) -> u64 {
        self.mesh_gen.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("dirty", &self.is_dirty())
            .field("mesh_pending", &self.is_mesh_pending())
            .field("mesh_gen", &self.mesh_generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Solid;

    impl BlockSource for Solid {
        fn block_at(&self, _wx: i32, wy: i32, _wz: i32) -> BlockType {
            if wy < 10 { BlockType::Stone } else { BlockType::Air }
        }
    }

    #[test]
    fn neighbor_queries_leave_the_chunk_through_the_source() {
        let source: Arc<dyn BlockSource> = Arc::new(Solid);
        let chunk = Chunk::from_blocks(ChunkCoord::new(2, -1), Vec::new(), Arc::downgrade(&source));
        assert!(chunk.is_air(3, 5, 3));
        assert!(!chunk.is_air(-1, 5, 3));
        assert!(!chunk.is_air(16, 5, 3));
        assert!(!chunk.is_air(3, 5, -1));
        assert!(chunk.is_air(3, 12, 16));
        assert!(chunk.is_air(3, -1, 3));
        assert!(chunk.is_air(3, CHUNK_HEIGHT as i32, 3));
        drop(source);
        assert!(chunk.is_air(-1, 5, 3));
    }

    #[test]
    fn set_local_reports_changes_only() {
        let chunk = Chunk::detached(ChunkCoord::new(0, 0), Vec::new());
        assert!(chunk.set_local(1, 2, 3, BlockType::Dirt));
        assert!(!chunk.set_local(1, 2, 3, BlockType::Dirt));
        assert!(!chunk.set_local(16, 2, 3, BlockType::Dirt));
        assert_eq!(chunk.block_local(1, 2, 3), BlockType::Dirt);
        assert_eq!(chunk.count_non_air(), 1);
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn mesh_pending_coalesces_until_the_job_starts() {
        let chunk = Chunk::detached(ChunkCoord::new(0, 0), Vec::new());
        chunk.mark_dirty();
        assert!(chunk.try_mark_mesh_pending());
        assert!(!chunk.try_mark_mesh_pending());
        assert_eq!(chunk.begin_mesh(), 1);
        assert!(!chunk.is_dirty());
        assert!(chunk.try_mark_mesh_pending());
    }

    #[test]
    fn mesh_generations_increase_per_job() {
        let chunk = Chunk::detached(ChunkCoord::new(0, 0), Vec::new());
        assert_eq!(chunk.mesh_generation(), 0);
        let first = chunk.begin_mesh();
        let second = chunk.begin_mesh();
        assert!(second > first);
        assert_eq!(chunk.mesh_generation(), second);
    }
}
