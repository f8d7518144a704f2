//! Shape catalog and rotation tests

use tetris_board::core::{definition, Bitmask, Piece, CATALOG};
use tetris_board::types::{ColorTag, Direction, ShapeKind};

#[test]
fn test_catalog_order_and_colors() {
    let expected = [
        (ShapeKind::I, ColorTag::Red, 4),
        (ShapeKind::J, ColorTag::Blue, 3),
        (ShapeKind::L, ColorTag::Orange, 3),
        (ShapeKind::O, ColorTag::Green, 2),
        (ShapeKind::S, ColorTag::DarkGray, 3),
        (ShapeKind::T, ColorTag::Brown, 3),
        (ShapeKind::Z, ColorTag::OrangeRed, 3),
    ];
    for (def, (kind, color, size)) in CATALOG.iter().zip(expected) {
        assert_eq!(def.kind, kind);
        assert_eq!(def.color, color);
        assert_eq!(def.mask().size(), size);
        assert_eq!(def.mask().cell_count(), 4, "{kind:?}");
    }
}

#[test]
fn test_definition_lookup() {
    for kind in ShapeKind::ALL {
        assert_eq!(definition(kind).kind, kind);
    }
}

#[test]
fn test_i_rotates_to_vertical() {
    let horizontal = definition(ShapeKind::I).mask();
    let right = horizontal.rotated(Direction::Right);
    assert_eq!(right, Bitmask::from_pattern(&["..#.", "..#.", "..#.", "..#."]));

    let left = horizontal.rotated(Direction::Left);
    assert_eq!(left, Bitmask::from_pattern(&[".#..", ".#..", ".#..", ".#.."]));
}

#[test]
fn test_opposite_rotations_cancel() {
    for kind in ShapeKind::ALL {
        let mask = definition(kind).mask();
        assert_eq!(
            mask.rotated(Direction::Left).rotated(Direction::Right),
            mask,
            "{kind:?}"
        );
    }
}

#[test]
fn test_o_rotation_is_identity() {
    let mask = definition(ShapeKind::O).mask();
    assert_eq!(mask.rotated(Direction::Right), mask);
    assert_eq!(mask.rotated(Direction::Left), mask);
}

#[test]
fn test_piece_rotation_is_two_phase() {
    let mut piece = Piece::new(ShapeKind::J);
    let proposed = piece.rotated_mask(Direction::Right);

    // proposing a rotation leaves the piece alone
    assert_eq!(*piece.mask(), definition(ShapeKind::J).mask());

    piece.set_mask(proposed);
    assert_eq!(*piece.mask(), Bitmask::from_pattern(&[".##", ".#.", ".#."]));
}
