use log::debug;
use parking_lot::RwLock;
use strata_blocks::BlockType;
use strata_mesh_cpu::VolumeSnapshot;
use strata_store::VoxelObserver;
use strata_world::{CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord};

use crate::StreamError;
use crate::config::VolumeConfig;

struct Inner {
    data: Vec<u8>,
    /// Chunk currently written into each chunk-sized slot.
    owners: Vec<Option<ChunkCoord>>,
}

/// CPU mirror of the volumetric texture: a ring window over the loaded world
/// with wraparound addressing on x and z. Layout is x fastest, then y, then z.
pub struct VolumeRegion {
    width: usize,
    height: usize,
    depth: usize,
    inner: RwLock<Inner>,
}

impl VolumeRegion {
    pub fn new(cfg: VolumeConfig) -> Result<Self, StreamError> {
        cfg.validate(0)?;
        let slots = (cfg.width / CHUNK_SIZE) * (cfg.depth / CHUNK_SIZE);
        Ok(Self {
            width: cfg.width,
            height: cfg.height.min(CHUNK_HEIGHT),
            depth: cfg.depth,
            inner: RwLock::new(Inner {
                data: vec![0u8; cfg.width * cfg.height.min(CHUNK_HEIGHT) * cfg.depth],
                owners: vec![None; slots],
            }),
        })
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }

    #[inline]
    fn wrap(&self, wx: i32, wz: i32) -> (usize, usize) {
        (
            wx.rem_euclid(self.width as i32) as usize,
            wz.rem_euclid(self.depth as i32) as usize,
        )
    }

    fn slot(&self, coord: ChunkCoord) -> usize {
        let (ox, _, oz) = coord.world_origin();
        let (x, z) = self.wrap(ox, oz);
        (z / CHUNK_SIZE) * (self.width / CHUNK_SIZE) + x / CHUNK_SIZE
    }

    pub fn get(&self, wx: i32, wy: i32, wz: i32) -> u8 {
        if wy < 0 || wy as usize >= self.height {
            return 0;
        }
        let (x, z) = self.wrap(wx, wz);
        let at = self.offset(x, wy as usize, z);
        self.inner.read().data[at]
    }

    pub fn set_voxel(&self, wx: i32, wy: i32, wz: i32, id: u8) {
        if wy < 0 || wy as usize >= self.height {
            return;
        }
        let (x, z) = self.wrap(wx, wz);
        let at = self.offset(x, wy as usize, z);
        self.inner.write().data[at] = id;
    }

    pub fn owner(&self, coord: ChunkCoord) -> Option<ChunkCoord> {
        self.inner.read().owners[self.slot(coord)]
    }

    /// Bulk write of one chunk's voxels into its slot.
    pub fn write_chunk(&self, snap: &VolumeSnapshot) {
        let (ox, _, oz) = snap.coord.world_origin();
        let (x0, z0) = self.wrap(ox, oz);
        let slot = self.slot(snap.coord);
        let mut inner = self.inner.write();
        for lz in 0..CHUNK_SIZE {
            for y in 0..self.height {
                let at = self.offset(x0, y, z0 + lz);
                inner.data[at..at + CHUNK_SIZE].copy_from_slice(snap.row(y, lz));
            }
        }
        inner.owners[slot] = Some(snap.coord);
    }

    /// Zero-fills the chunk's slot if this chunk still owns it. A slot that was
    /// taken over by a newer chunk is left alone.
    pub fn clear_chunk(&self, coord: ChunkCoord) -> bool {
        let (ox, _, oz) = coord.world_origin();
        let (x0, z0) = self.wrap(ox, oz);
        let slot = self.slot(coord);
        let mut inner = self.inner.write();
        match inner.owners[slot] {
            Some(owner) if owner == coord => {}
            other => {
                debug!(target: "upload", "volume slot for {:?} owned by {:?}; not clearing", coord, other);
                return false;
            }
        }
        for lz in 0..CHUNK_SIZE {
            for y in 0..self.height {
                let at = self.offset(x0, y, z0 + lz);
                inner.data[at..at + CHUNK_SIZE].fill(0);
            }
        }
        inner.owners[slot] = None;
        true
    }
}

impl VoxelObserver for VolumeRegion {
    fn voxel_changed(&self, wx: i32, wy: i32, wz: i32, block: BlockType) {
        self.set_voxel(wx, wy, wz, block.id());
    }
}
