use hashbrown::HashMap;
use log::{debug, trace};
use parking_lot::Mutex;
use strata_mesh_cpu::ChunkMeshCPU;
use strata_store::WorldStore;
use strata_world::ChunkCoord;

use crate::scheduler::PendingMesh;
use crate::upload::UploadStats;
use crate::volume::VolumeRegion;

/// World-space position of a render representation: the chunk's block origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderKey {
    pub x: i32,
    pub z: i32,
}

impl RenderKey {
    pub fn from_coord(coord: ChunkCoord) -> Self {
        let (x, _, z) = coord.world_origin();
        Self { x, z }
    }

    pub fn coord(self) -> ChunkCoord {
        ChunkCoord::from_block(self.x, self.z)
    }
}

/// The graphics layer's side of the upload protocol.
pub trait Presenter {
    fn create(&mut self, key: RenderKey, mesh: &ChunkMeshCPU);
    /// Replace vertex data of an existing representation in place.
    fn update(&mut self, key: RenderKey, mesh: &ChunkMeshCPU);
    fn destroy(&mut self, key: RenderKey);
}

struct Inner<P> {
    presenter: P,
    /// Mesh generation of the representation currently presented.
    live: HashMap<RenderKey, u64>,
    stats: UploadStats,
}

/// Live render representations, at most one per chunk coordinate.
///
/// Upload validation and unload application run under one lock, so a mesh
/// can never be applied between a chunk's removal check and its retirement.
pub struct RenderSet<P> {
    inner: Mutex<Inner<P>>,
}

impl<P: Presenter> RenderSet<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            inner: Mutex::new(Inner {
                presenter,
                live: HashMap::new(),
                stats: UploadStats::default(),
            }),
        }
    }

    /// Applies a finished mesh if its chunk is still the one in the store and
    /// no newer mesh of that chunk has been applied already.
    /// Returns whether a representation was created or updated.
    pub fn apply_upload(&self, item: &PendingMesh, store: &WorldStore, volume: &VolumeRegion) -> bool {
        let coord = item.chunk.coord();
        let mut inner = self.inner.lock();
        if !store.holds(&item.chunk) {
            inner.stats.discarded += 1;
            debug!(target: "upload", "discarded stale mesh for {:?}", coord);
            return false;
        }
        let key = RenderKey::from_coord(coord);
        let quads = item.mesh.quad_count();
        let Inner {
            presenter,
            live,
            stats,
        } = &mut *inner;
        match live.get_mut(&key) {
            Some(shown) if item.generation < *shown => {
                stats.discarded += 1;
                debug!(
                    target: "upload",
                    "discarded superseded mesh for {:?} (gen {} < {})",
                    coord, item.generation, *shown
                );
                return false;
            }
            Some(shown) => {
                presenter.update(key, &item.mesh);
                *shown = item.generation;
                stats.updated += 1;
            }
            None => {
                presenter.create(key, &item.mesh);
                live.insert(key, item.generation);
                stats.created += 1;
            }
        }
        volume.write_chunk(&item.mesh.volume);
        stats.applied += 1;
        trace!(target: "upload", "applied {:?} ({} quads)", coord, quads);
        true
    }

    /// Retires the representation of an unloaded chunk and clears its volume slot.
    pub fn apply_unload(&self, coord: ChunkCoord, volume: &VolumeRegion) -> bool {
        let key = RenderKey::from_coord(coord);
        let mut inner = self.inner.lock();
        let found = inner.live.remove(&key).is_some();
        if found {
            inner.presenter.destroy(key);
            inner.stats.destroyed += 1;
        } else {
            inner.stats.ghosts += 1;
            debug!(target: "ghost", "unload of {:?} found no render representation", coord);
        }
        volume.clear_chunk(coord);
        found
    }

    pub fn stats(&self) -> UploadStats {
        self.inner.lock().stats
    }

    pub fn len(&self) -> usize {
        self.inner.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().live.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.inner.lock().live.contains_key(&RenderKey::from_coord(coord))
    }

    pub fn keys(&self) -> Vec<RenderKey> {
        let mut keys: Vec<RenderKey> = self.inner.lock().live.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.lock().presenter)
    }
}
