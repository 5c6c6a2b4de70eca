use serde::{Deserialize, Serialize};

use crate::CHUNK_SIZE;

/// Horizontal position of a chunk column on the chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing world block `(wx, _, wz)`.
    #[inline]
    pub fn from_block(wx: i32, wz: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self::new(wx.div_euclid(s), wz.div_euclid(s))
    }

    /// Chunk containing a continuous world position.
    #[inline]
    pub fn from_world_pos(x: f32, z: f32) -> Self {
        let s = CHUNK_SIZE as f32;
        Self::new((x / s).floor() as i32, (z / s).floor() as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// Max of the per-axis distances; the streaming radius metric.
    #[inline]
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }

    /// World block position of this chunk's `(0, 0, 0)` corner.
    #[inline]
    pub fn world_origin(self) -> (i32, i32, i32) {
        let s = CHUNK_SIZE as i32;
        (self.cx * s, 0, self.cz * s)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_floor_toward_negative_chunks() {
        assert_eq!(ChunkCoord::from_block(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block(-17, 15), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::from_world_pos(-0.5, 16.0), ChunkCoord::new(-1, 1));
    }

    #[test]
    fn chebyshev_takes_the_larger_axis() {
        let a = ChunkCoord::new(3, -2);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(0, 0)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, 5)), 7);
        assert_eq!(a.chebyshev_distance(a), 0);
    }
}
