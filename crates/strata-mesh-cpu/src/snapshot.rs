use strata_blocks::BlockType;
use strata_chunk::idx;
use strata_world::{CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord};

/// Block ids of one chunk in voxel index order (x fastest, then y, then z),
/// for a bulk write into the volumetric texture region.
#[derive(Clone, PartialEq, Eq)]
pub struct VolumeSnapshot {
    pub coord: ChunkCoord,
    bytes: Vec<u8>,
}

impl VolumeSnapshot {
    pub fn from_blocks(coord: ChunkCoord, blocks: &[BlockType]) -> Self {
        let mut bytes: Vec<u8> = blocks.iter().map(|b| b.id()).collect();
        bytes.resize(CHUNK_VOLUME, BlockType::Air.id());
        Self { coord, bytes }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.bytes[idx(x, y, z)]
    }

    /// The 16 ids along x at `(y, z)`.
    #[inline]
    pub fn row(&self, y: usize, z: usize) -> &[u8] {
        let start = idx(0, y, z);
        &self.bytes[start..start + CHUNK_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for VolumeSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solid = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("VolumeSnapshot")
            .field("coord", &self.coord)
            .field("non_air", &solid)
            .finish()
    }
}
