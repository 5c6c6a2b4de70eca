/// Tiles per row in the square block texture atlas.
pub const ATLAS_TILES_PER_ROW: u8 = 16;

/// A cell in the block texture atlas, addressed by column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasTile {
    pub col: u8,
    pub row: u8,
}

impl AtlasTile {
    #[inline]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Normalized `(u0, v0, u1, v1)` rectangle of this tile.
    #[inline]
    pub fn uv_rect(self) -> (f32, f32, f32, f32) {
        let step = 1.0 / ATLAS_TILES_PER_ROW as f32;
        let u0 = self.col as f32 * step;
        let v0 = self.row as f32 * step;
        (u0, v0, u0 + step, v0 + step)
    }
}
