use serde::{Deserialize, Serialize};

use crate::atlas::AtlasTile;

/// One voxel's material, stored as a single byte in chunk grids and volume snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Sand = 4,
    Gravel = 5,
    Snow = 6,
    Podzol = 7,
    Water = 8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

impl BlockType {
    pub const ALL: [BlockType; 9] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Gravel,
        BlockType::Snow,
        BlockType::Podzol,
        BlockType::Water,
    ];

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decodes a stored byte. Unknown ids decode as air so stale snapshots never panic.
    #[inline]
    pub const fn from_id(id: u8) -> BlockType {
        match id {
            1 => BlockType::Stone,
            2 => BlockType::Dirt,
            3 => BlockType::Grass,
            4 => BlockType::Sand,
            5 => BlockType::Gravel,
            6 => BlockType::Snow,
            7 => BlockType::Podzol,
            8 => BlockType::Water,
            _ => BlockType::Air,
        }
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockType::Air)
    }

    /// Rendered in the translucent pass.
    #[inline]
    pub const fn is_translucent(self) -> bool {
        matches!(self, BlockType::Water)
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        !self.is_air() && !self.is_translucent()
    }

    /// Whether a face of `self` is visible when `neighbor` sits on the other side.
    ///
    /// Opaque blocks show faces against air and water; water only shows faces
    /// against air so that water bodies do not render their internal seams.
    #[inline]
    pub const fn face_visible_against(self, neighbor: BlockType) -> bool {
        match self {
            BlockType::Air => false,
            BlockType::Water => neighbor.is_air(),
            _ => !neighbor.is_opaque(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Sand => "sand",
            BlockType::Gravel => "gravel",
            BlockType::Snow => "snow",
            BlockType::Podzol => "podzol",
            BlockType::Water => "water",
        }
    }

    pub fn atlas_tile(self, role: FaceRole) -> AtlasTile {
        match (self, role) {
            (BlockType::Grass, FaceRole::Top) => AtlasTile::new(0, 0),
            (BlockType::Grass, FaceRole::Side) => AtlasTile::new(3, 0),
            (BlockType::Grass, FaceRole::Bottom) | (BlockType::Dirt, _) => AtlasTile::new(2, 0),
            (BlockType::Stone, _) => AtlasTile::new(1, 0),
            (BlockType::Sand, _) => AtlasTile::new(2, 1),
            (BlockType::Gravel, _) => AtlasTile::new(3, 1),
            (BlockType::Snow, FaceRole::Top) => AtlasTile::new(2, 4),
            (BlockType::Snow, FaceRole::Side) => AtlasTile::new(4, 4),
            (BlockType::Snow, FaceRole::Bottom) => AtlasTile::new(2, 0),
            (BlockType::Podzol, FaceRole::Top) => AtlasTile::new(14, 0),
            (BlockType::Podzol, FaceRole::Side) => AtlasTile::new(13, 0),
            (BlockType::Podzol, FaceRole::Bottom) => AtlasTile::new(2, 0),
            (BlockType::Water, _) => AtlasTile::new(13, 12),
            (BlockType::Air, _) => AtlasTile::new(15, 15),
        }
    }

    /// Flat base color used by debug meshing and map rasterization.
    pub const fn base_color(self) -> [u8; 4] {
        match self {
            BlockType::Air => [0, 0, 0, 0],
            BlockType::Stone => [125, 125, 125, 255],
            BlockType::Dirt => [134, 96, 67, 255],
            BlockType::Grass => [95, 159, 53, 255],
            BlockType::Sand => [219, 207, 163, 255],
            BlockType::Gravel => [136, 126, 126, 255],
            BlockType::Snow => [240, 251, 251, 255],
            BlockType::Podzol => [91, 63, 24, 255],
            BlockType::Water => [47, 87, 214, 160],
        }
    }
}

impl From<BlockType> for u8 {
    fn from(value: BlockType) -> Self {
        value.id()
    }
}

impl From<u8> for BlockType {
    fn from(value: u8) -> Self {
        BlockType::from_id(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_decode_back() {
        for (i, b) in BlockType::ALL.iter().enumerate() {
            assert_eq!(b.id() as usize, i);
            assert_eq!(BlockType::from_id(b.id()), *b);
        }
        assert_eq!(BlockType::from_id(200), BlockType::Air);
    }

    #[test]
    fn water_faces_only_show_against_air() {
        assert!(BlockType::Water.face_visible_against(BlockType::Air));
        assert!(!BlockType::Water.face_visible_against(BlockType::Water));
        assert!(!BlockType::Water.face_visible_against(BlockType::Stone));
        assert!(BlockType::Stone.face_visible_against(BlockType::Water));
        assert!(!BlockType::Stone.face_visible_against(BlockType::Dirt));
        assert!(!BlockType::Air.face_visible_against(BlockType::Air));
    }
}
