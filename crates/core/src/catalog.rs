//! Piece catalog - the seven shape definitions
//!
//! Each definition is a square bitmask plus a color tag. Shapes are stored in
//! their spawn orientation; rotation always produces a new mask, the catalog
//! itself never changes.

use crate::rng::SimpleRng;
use crate::types::{ColorTag, Direction, ShapeKind, SHAPE_COUNT};

/// Largest bitmask side length used by the catalog
pub const MAX_MASK_SIZE: usize = 4;

/// Square grid of filled sub-cells.
///
/// Row `i`, column `j` is filled when bit `j` of `rows[i]` is set.
/// Only the top-left `size x size` region is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitmask {
    size: u8,
    rows: [u8; MAX_MASK_SIZE],
}

impl Bitmask {
    /// Build a mask from text rows, `#` marking a filled sub-cell.
    ///
    /// Panics unless the pattern is square and at most 4 wide.
    pub fn from_pattern(pattern: &[&str]) -> Self {
        let size = pattern.len();
        assert!(
            (1..=MAX_MASK_SIZE).contains(&size),
            "bitmask size {} out of range",
            size
        );

        let mut rows = [0u8; MAX_MASK_SIZE];
        for (i, line) in pattern.iter().enumerate() {
            assert_eq!(line.len(), size, "bitmask row {} is not square", i);
            for (j, ch) in line.bytes().enumerate() {
                match ch {
                    b'#' => rows[i] |= 1 << j,
                    b'.' => {}
                    other => panic!("invalid bitmask character {:?}", other as char),
                }
            }
        }

        Self {
            size: size as u8,
            rows,
        }
    }

    /// Side length N of the N x N mask
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether sub-cell (row, col) is filled
    #[inline]
    pub fn is_filled(&self, row: u8, col: u8) -> bool {
        row < self.size && col < self.size && self.rows[row as usize] & (1 << col) != 0
    }

    /// Filled sub-cells as (row, col), top to bottom, left to right
    pub fn filled_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let size = self.size;
        (0..size)
            .flat_map(move |i| (0..size).map(move |j| (i, j)))
            .filter(move |&(i, j)| self.is_filled(i, j))
    }

    /// Number of filled sub-cells
    pub fn cell_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// A copy rotated by 90 degrees; `Right` is clockwise.
    pub fn rotated(&self, direction: Direction) -> Self {
        let n = self.size;
        let mut rows = [0u8; MAX_MASK_SIZE];
        for (i, j) in self.filled_cells() {
            let (ni, nj) = match direction {
                Direction::Right => (j, n - 1 - i),
                Direction::Left => (n - 1 - j, i),
            };
            rows[ni as usize] |= 1 << nj;
        }
        Self { size: n, rows }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy)]
pub struct ShapeDefinition {
    pub kind: ShapeKind,
    pub color: ColorTag,
    pattern: &'static [&'static str],
}

impl ShapeDefinition {
    /// Spawn-orientation bitmask
    pub fn mask(&self) -> Bitmask {
        Bitmask::from_pattern(self.pattern)
    }
}

/// Catalog definitions, indexed by `ShapeKind::index()`
pub static CATALOG: [ShapeDefinition; SHAPE_COUNT] = [
    ShapeDefinition {
        kind: ShapeKind::I,
        color: ColorTag::Red,
        pattern: &["....", "####", "....", "...."],
    },
    ShapeDefinition {
        kind: ShapeKind::J,
        color: ColorTag::Blue,
        pattern: &["#..", "###", "..."],
    },
    ShapeDefinition {
        kind: ShapeKind::L,
        color: ColorTag::Orange,
        pattern: &["..#", "###", "..."],
    },
    ShapeDefinition {
        kind: ShapeKind::O,
        color: ColorTag::Green,
        pattern: &["##", "##"],
    },
    ShapeDefinition {
        kind: ShapeKind::S,
        color: ColorTag::DarkGray,
        pattern: &[".##", "##.", "..."],
    },
    ShapeDefinition {
        kind: ShapeKind::T,
        color: ColorTag::Brown,
        pattern: &[".#.", "###", "..."],
    },
    ShapeDefinition {
        kind: ShapeKind::Z,
        color: ColorTag::OrangeRed,
        pattern: &["##.", ".##", "..."],
    },
];

/// Catalog entry for a shape kind
pub fn definition(kind: ShapeKind) -> &'static ShapeDefinition {
    &CATALOG[kind.index() as usize]
}

/// Uniformly selected catalog shape
pub fn random_shape(rng: &mut SimpleRng) -> ShapeKind {
    let index = rng.next_range(SHAPE_COUNT as u32) as usize;
    CATALOG[index].kind
}
