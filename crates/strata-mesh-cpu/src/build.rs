use std::time::Instant;

use log::trace;
use strata_blocks::BlockType;
use strata_chunk::{Chunk, idx};
use strata_world::{CHUNK_HEIGHT, CHUNK_SIZE};

use crate::chunk::ChunkMeshCPU;
use crate::face::Face;
use crate::mesh_build::{MeshBuild, Vec3};
use crate::snapshot::VolumeSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshOptions {
    /// Color faces by a hash of the voxel's world position instead of
    /// texturing them from the atlas.
    pub debug_colors: bool,
}

/// Deterministic per-voxel color from world coordinates; stable across reloads.
pub fn debug_color(wx: i32, wy: i32, wz: i32, alpha: u8) -> [u8; 4] {
    let mut h = (wx as u32).wrapping_mul(0x8DA6_B343)
        ^ (wy as u32).wrapping_mul(0xD816_3841)
        ^ (wz as u32).wrapping_mul(0xCB1A_B31F);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    [(h & 0xFF) as u8, ((h >> 8) & 0xFF) as u8, ((h >> 16) & 0xFF) as u8, alpha]
}

/// Builds the face-culled mesh of one chunk.
///
/// Faces inside the chunk are culled against a local snapshot; faces on the
/// column boundary ask the chunk, which resolves them through the world store,
/// so a missing neighbor leaves the boundary face exposed.
pub fn build_chunk_mesh(chunk: &Chunk, opts: MeshOptions) -> ChunkMeshCPU {
    let t0 = Instant::now();
    let coord = chunk.coord();
    let blocks = chunk.snapshot();
    let (bx, _, bz) = chunk.world_origin();
    let s = CHUNK_SIZE as i32;
    let h = CHUNK_HEIGHT as i32;

    let mut opaque = MeshBuild::default();
    let mut translucent = MeshBuild::default();
    opaque.reserve_quads(1024);

    for z in 0..CHUNK_SIZE {
        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_SIZE {
                let here = blocks[idx(x, y, z)];
                if here.is_air() {
                    continue;
                }
                let (lx, ly, lz) = (x as i32, y as i32, z as i32);
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (lx + dx, ly + dy, lz + dz);
                    let neighbor = if ny < 0 || ny >= h {
                        BlockType::Air
                    } else if (0..s).contains(&nx) && (0..s).contains(&nz) {
                        blocks[idx(nx as usize, ny as usize, nz as usize)]
                    } else {
                        chunk.neighbor_block(nx, ny, nz)
                    };
                    if !here.face_visible_against(neighbor) {
                        continue;
                    }
                    let (rect, rgba) = if opts.debug_colors {
                        let alpha = here.base_color()[3];
                        ((0.0, 0.0, 1.0, 1.0), debug_color(bx + lx, ly, bz + lz, alpha))
                    } else {
                        (here.atlas_tile(face.role()).uv_rect(), [255, 255, 255, here.base_color()[3]])
                    };
                    let origin = Vec3::new(x as f32, y as f32, z as f32);
                    let out = if here.is_translucent() {
                        &mut translucent
                    } else {
                        &mut opaque
                    };
                    out.add_voxel_face(face, origin, rect, rgba);
                }
            }
        }
    }

    let mesh = ChunkMeshCPU {
        coord,
        opaque,
        translucent,
        volume: VolumeSnapshot::from_blocks(coord, &blocks),
    };
    trace!(
        target: "mesh",
        "meshed {:?}: {} opaque + {} translucent quads in {}us",
        coord,
        mesh.opaque.quad_count(),
        mesh.translucent.quad_count(),
        t0.elapsed().as_micros()
    );
    mesh
}
