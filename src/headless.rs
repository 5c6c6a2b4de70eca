use hashbrown::HashMap;
use strata_mesh_cpu::{ChunkMeshCPU, MeshBuild};
use strata_runtime::{Presenter, RenderKey};

#[derive(Clone, Copy, Debug, Default)]
struct ChunkRender {
    opaque_quads: usize,
    translucent_quads: usize,
    bytes: usize,
}

fn buffer_bytes(m: &MeshBuild) -> usize {
    (m.pos.len() + m.norm.len() + m.uv.len()) * std::mem::size_of::<f32>()
        + m.col.len()
        + m.idx.len() * std::mem::size_of::<u32>()
}

impl ChunkRender {
    fn from_mesh(mesh: &ChunkMeshCPU) -> Self {
        Self {
            opaque_quads: mesh.opaque.quad_count(),
            translucent_quads: mesh.translucent.quad_count(),
            bytes: buffer_bytes(&mesh.opaque) + buffer_bytes(&mesh.translucent),
        }
    }
}

/// Presenter without a GPU: keeps per-chunk buffer sizes so a headless run
/// can report what a renderer would hold.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    live: HashMap<RenderKey, ChunkRender>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    pub live: usize,
    pub opaque_quads: usize,
    pub translucent_quads: usize,
    pub bytes: usize,
}

impl HeadlessPresenter {
    pub fn summary(&self) -> HeadlessSummary {
        self.live.values().fold(
            HeadlessSummary {
                live: self.live.len(),
                ..HeadlessSummary::default()
            },
            |mut acc, r| {
                acc.opaque_quads += r.opaque_quads;
                acc.translucent_quads += r.translucent_quads;
                acc.bytes += r.bytes;
                acc
            },
        )
    }
}

impl Presenter for HeadlessPresenter {
    fn create(&mut self, key: RenderKey, mesh: &ChunkMeshCPU) {
        self.live.insert(key, ChunkRender::from_mesh(mesh));
    }

    fn update(&mut self, key: RenderKey, mesh: &ChunkMeshCPU) {
        self.live.insert(key, ChunkRender::from_mesh(mesh));
    }

    fn destroy(&mut self, key: RenderKey) {
        self.live.remove(&key);
    }
}
