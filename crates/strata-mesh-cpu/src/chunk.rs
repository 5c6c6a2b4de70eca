use strata_world::ChunkCoord;

use crate::mesh_build::MeshBuild;
use crate::snapshot::VolumeSnapshot;

/// CPU output of one chunk mesh pass. Vertex positions are local to the
/// chunk's world origin.
#[derive(Clone, Debug)]
pub struct ChunkMeshCPU {
    pub coord: ChunkCoord,
    pub opaque: MeshBuild,
    pub translucent: MeshBuild,
    pub volume: VolumeSnapshot,
}

impl ChunkMeshCPU {
    pub fn quad_count(&self) -> usize {
        self.opaque.quad_count() + self.translucent.quad_count()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }
}
