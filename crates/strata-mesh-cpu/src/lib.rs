//! CPU meshing crate: face-culled chunk meshes and volume snapshots (engine-only).
#![forbid(unsafe_code)]

mod build;
mod chunk;
mod face;
mod mesh_build;
mod snapshot;

pub use build::{MeshOptions, build_chunk_mesh, debug_color};
pub use chunk::ChunkMeshCPU;
pub use face::Face;
pub use mesh_build::{MeshBuild, Vec3};
pub use snapshot::VolumeSnapshot;
