use crate::face::Face;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[inline]
    fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }
}

/// Flat vertex arrays ready for a GPU upload: 4 vertices and 6 indices per quad.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        // 4 vertices per quad
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad with explicit per-vertex UVs. Corners are given in loop
    /// order; winding is fixed up so the front face points along `n`.
    pub fn add_quad_uv(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3, uvs: [(f32, f32); 4], rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let mut vs = [a, b, c, d];
        let mut uvs = uvs;
        let e1 = vs[1].sub(vs[0]);
        let e2 = vs[2].sub(vs[0]);
        if e1.cross(e2).dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Emits the unit face of the voxel whose minimum corner is `origin`,
    /// mapping `rect = (u0, v0, u1, v1)` across it with v growing downward.
    pub fn add_voxel_face(&mut self, face: Face, origin: Vec3, rect: (f32, f32, f32, f32), rgba: [u8; 4]) {
        let corners: [(f32, f32, f32); 4] = match face {
            Face::PosY => [(0.0, 1.0, 0.0), (1.0, 1.0, 0.0), (1.0, 1.0, 1.0), (0.0, 1.0, 1.0)],
            Face::NegY => [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 1.0), (0.0, 0.0, 1.0)],
            Face::PosX => [(1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (1.0, 1.0, 1.0), (1.0, 0.0, 1.0)],
            Face::NegX => [(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 1.0, 1.0), (0.0, 0.0, 1.0)],
            Face::PosZ => [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 1.0), (0.0, 1.0, 1.0)],
            Face::NegZ => [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)],
        };
        let (u0, v0, u1, v1) = rect;
        let uv_of = |(dx, dy, dz): (f32, f32, f32)| {
            let (s, t) = match face {
                Face::PosY | Face::NegY => (dx, dz),
                Face::PosX | Face::NegX => (dz, 1.0 - dy),
                Face::PosZ | Face::NegZ => (dx, 1.0 - dy),
            };
            (u0 + s * (u1 - u0), v0 + t * (v1 - v0))
        };
        let at = |(dx, dy, dz): (f32, f32, f32)| Vec3::new(origin.x + dx, origin.y + dy, origin.z + dz);
        let uvs = [uv_of(corners[0]), uv_of(corners[1]), uv_of(corners[2]), uv_of(corners[3])];
        self.add_quad_uv(
            at(corners[0]),
            at(corners[1]),
            at(corners[2]),
            at(corners[3]),
            face.normal(),
            uvs,
            rgba,
        );
    }
}
