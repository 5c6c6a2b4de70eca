use proptest::prelude::*;
use strata_blocks::{AtlasTile, BlockType, FaceRole};

proptest! {
    // Every byte decodes to some block; known ids round-trip through u8.
    #[test]
    fn any_byte_decodes(id in any::<u8>()) {
        let b = BlockType::from_id(id);
        if id <= 8 {
            prop_assert_eq!(u8::from(b), id);
        } else {
            prop_assert_eq!(b, BlockType::Air);
        }
    }

    // Atlas rectangles stay inside the unit square.
    #[test]
    fn atlas_rect_in_unit_square(col in 0u8..16, row in 0u8..16) {
        let (u0, v0, u1, v1) = AtlasTile::new(col, row).uv_rect();
        prop_assert!(u0 >= 0.0 && v0 >= 0.0);
        prop_assert!(u1 <= 1.0 + 1e-6 && v1 <= 1.0 + 1e-6);
        prop_assert!(u1 > u0 && v1 > v0);
    }
}

#[test]
fn opaque_faces_hidden_between_solids() {
    for a in BlockType::ALL {
        for b in BlockType::ALL {
            if a.is_opaque() && b.is_opaque() {
                assert!(!a.face_visible_against(b));
            }
        }
    }
}

#[test]
fn grass_has_distinct_top_and_side_tiles() {
    assert_ne!(
        BlockType::Grass.atlas_tile(FaceRole::Top),
        BlockType::Grass.atlas_tile(FaceRole::Side)
    );
}
