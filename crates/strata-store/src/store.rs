use std::fmt;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::trace;
use parking_lot::RwLock;
use strata_blocks::BlockType;
use strata_chunk::{BlockSource, Chunk};
use strata_world::{BiomeClassifier, CHUNK_SIZE, ChunkCoord, split_axis, y_in_bounds};

use crate::neighbors::Neighbors;

/// Notified after every voxel write that changed the store.
pub trait VoxelObserver: Send + Sync {
    fn voxel_changed(&self, wx: i32, wy: i32, wz: i32, block: BlockType);
}

/// Owns every loaded chunk, keyed by chunk coordinate.
///
/// Readers never block on membership changes. A coordinate is present only
/// once its chunk is fully generated; generation happens before
/// [`WorldStore::insert_if_absent`].
pub struct WorldStore {
    chunks: DashMap<ChunkCoord, Arc<Chunk>>,
    observers: RwLock<Vec<Arc<dyn VoxelObserver>>>,
}

impl WorldStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chunks: DashMap::new(),
            observers: RwLock::new(Vec::new()),
        })
    }

    /// Non-owning handle given to chunks for cross-boundary lookups.
    pub fn source_handle(self: &Arc<Self>) -> Weak<dyn BlockSource> {
        let weak: Weak<WorldStore> = Arc::downgrade(self);
        weak
    }

    /// Builds a chunk bound to this store. It is not visible until inserted.
    pub fn generate_chunk(self: &Arc<Self>, coord: ChunkCoord, classifier: &BiomeClassifier) -> Chunk {
        Chunk::generate(coord, classifier, self.source_handle())
    }

    pub fn add_observer(&self, observer: Arc<dyn VoxelObserver>) {
        self.observers.write().push(observer);
    }

    /// Publishes `chunk` unless its coordinate is already taken. Returns the
    /// stored instance when this call inserted it.
    pub fn insert_if_absent(&self, chunk: Chunk) -> Option<Arc<Chunk>> {
        match self.chunks.entry(chunk.coord()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let chunk = Arc::new(chunk);
                slot.insert(Arc::clone(&chunk));
                trace!(target: "stream", "published {:?}", chunk.coord());
                Some(chunk)
            }
        }
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        let removed = self.chunks.remove(&coord).map(|(_, chunk)| chunk);
        if removed.is_some() {
            trace!(target: "stream", "removed {:?}", coord);
        }
        removed
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.get(&coord).map(|entry| Arc::clone(entry.value()))
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// True when the store currently holds exactly this chunk instance.
    pub fn holds(&self, chunk: &Arc<Chunk>) -> bool {
        self.chunks
            .get(&chunk.coord())
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), chunk))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Point-in-time list of loaded coordinates.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.chunks.iter().map(|entry| *entry.key()).collect()
    }

    pub fn chunks(&self) -> Vec<Arc<Chunk>> {
        self.chunks.iter().map(|entry| Arc::clone(entry.value())).collect()
    }

    pub fn dirty_chunks(&self) -> Vec<Arc<Chunk>> {
        self.chunks
            .iter()
            .filter(|entry| entry.value().is_dirty())
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Air when the owning chunk is absent or `wy` is outside the column.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        if !y_in_bounds(wy) {
            return BlockType::Air;
        }
        let (cx, lx) = split_axis(wx);
        let (cz, lz) = split_axis(wz);
        match self.chunks.get(&ChunkCoord::new(cx, cz)) {
            Some(chunk) => chunk.block_local(lx, wy as usize, lz),
            None => BlockType::Air,
        }
    }

    /// Writes one voxel and marks the owning chunk dirty, plus the neighbor
    /// across any boundary plane the voxel sits on. No-op when the chunk is
    /// absent, `wy` is out of bounds, or the voxel already holds `block`.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, block: BlockType) -> bool {
        if !y_in_bounds(wy) {
            return false;
        }
        let (cx, lx) = split_axis(wx);
        let (cz, lz) = split_axis(wz);
        let coord = ChunkCoord::new(cx, cz);
        let Some(chunk) = self.get(coord) else {
            return false;
        };
        if !chunk.set_local(lx, wy as usize, lz, block) {
            return false;
        }
        chunk.mark_dirty();

        let last = CHUNK_SIZE - 1;
        let mut touched = Vec::with_capacity(2);
        if lx == 0 {
            touched.push(coord.offset(-1, 0));
        } else if lx == last {
            touched.push(coord.offset(1, 0));
        }
        if lz == 0 {
            touched.push(coord.offset(0, -1));
        } else if lz == last {
            touched.push(coord.offset(0, 1));
        }
        for n in touched {
            if let Some(neighbor) = self.get(n) {
                neighbor.mark_dirty();
            }
        }

        for observer in self.observers.read().iter() {
            observer.voxel_changed(wx, wy, wz, block);
        }
        true
    }

    pub fn neighbors(&self, coord: ChunkCoord) -> Neighbors {
        Neighbors {
            right: self.get(coord.offset(1, 0)),
            left: self.get(coord.offset(-1, 0)),
            front: self.get(coord.offset(0, 1)),
            back: self.get(coord.offset(0, -1)),
        }
    }
}

impl BlockSource for WorldStore {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self.get_block(wx, wy, wz)
    }
}

impl fmt::Debug for WorldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldStore")
            .field("chunks", &self.chunks.len())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}
