//! Pieces module - live piece instances
//!
//! A piece is a catalog shape plus a working copy of its bitmask. Rotation
//! is two-phase: [`Piece::rotated_mask`] computes the candidate without
//! touching the piece, and [`Piece::set_mask`] commits it once the board has
//! validated the placement. There are no wall kicks.

use crate::catalog::{definition, Bitmask};
use crate::types::{ColorTag, Direction, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    color: ColorTag,
    mask: Bitmask,
}

impl Piece {
    /// Create a piece in its catalog spawn orientation
    pub fn new(kind: ShapeKind) -> Self {
        let def = definition(kind);
        Self {
            kind,
            color: def.color,
            mask: def.mask(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> ColorTag {
        self.color
    }

    pub fn mask(&self) -> &Bitmask {
        &self.mask
    }

    /// Rotated copy of the current mask; the piece is left unchanged
    pub fn rotated_mask(&self, direction: Direction) -> Bitmask {
        self.mask.rotated(direction)
    }

    /// Replace the working mask.
    ///
    /// The new mask must keep the piece's dimensions; anything else means a
    /// corrupted shape and panics.
    pub fn set_mask(&mut self, mask: Bitmask) {
        assert_eq!(
            mask.size(),
            self.mask.size(),
            "mask size changed for {:?} piece",
            self.kind
        );
        self.mask = mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_uses_catalog_color() {
        let piece = Piece::new(ShapeKind::I);
        assert_eq!(piece.color(), ColorTag::Red);
        assert_eq!(piece.mask().size(), 4);
    }

    #[test]
    fn test_rotated_mask_does_not_mutate() {
        let piece = Piece::new(ShapeKind::L);
        let before = *piece.mask();
        let rotated = piece.rotated_mask(Direction::Right);
        assert_ne!(rotated, before);
        assert_eq!(*piece.mask(), before);
    }

    #[test]
    fn test_four_rotations_restore_mask() {
        for kind in ShapeKind::ALL {
            for direction in [Direction::Left, Direction::Right] {
                let mut piece = Piece::new(kind);
                let original = *piece.mask();
                for _ in 0..4 {
                    let next = piece.rotated_mask(direction);
                    piece.set_mask(next);
                }
                assert_eq!(*piece.mask(), original, "{:?} {:?}", kind, direction);
            }
        }
    }

    #[test]
    fn test_left_undoes_right() {
        let mut piece = Piece::new(ShapeKind::S);
        let original = *piece.mask();
        piece.set_mask(piece.rotated_mask(Direction::Right));
        piece.set_mask(piece.rotated_mask(Direction::Left));
        assert_eq!(*piece.mask(), original);
    }

    #[test]
    #[should_panic(expected = "mask size changed")]
    fn test_set_mask_rejects_other_dimensions() {
        let mut piece = Piece::new(ShapeKind::T);
        piece.set_mask(Piece::new(ShapeKind::O).mask().to_owned());
    }
}
