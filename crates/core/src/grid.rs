//! Grid module - the settled-cell matrix
//!
//! The grid is 10 columns by 22 rows (20 visible plus 2 hidden rows on top),
//! stored as a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21
//! (top to bottom). Anything outside that rectangle counts as wall or floor.

use arrayvec::ArrayVec;

use crate::catalog::Bitmask;
use crate::types::{Cell, ColorTag, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the grid
const GRID_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const ROWS: usize = BOARD_HEIGHT as usize;

/// Row indices removed by one clear, bottom to top
pub type ClearedRows = ArrayVec<usize, ROWS>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Out of bounds or occupied
    #[inline]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !matches!(self.get(x, y), Some(None))
    }

    /// Whether `mask` placed with its top-left corner at (x, y) overlaps a
    /// wall, the floor or a settled cell.
    pub fn intersects(&self, mask: &Bitmask, x: i32, y: i32) -> bool {
        mask.filled_cells()
            .any(|(i, j)| self.is_blocked(x + j as i32, y + i as i32))
    }

    /// Write the filled sub-cells of `mask` at (x, y).
    ///
    /// Sub-cells outside the grid are dropped. Returns how many were written.
    pub fn merge(&mut self, mask: &Bitmask, x: i32, y: i32, color: ColorTag) -> usize {
        mask.filled_cells()
            .filter(|&(i, j)| self.set(x + j as i32, y + i as i32, Some(color)))
            .count()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Remove every full row in `rows` and compact everything above it.
    ///
    /// Remaining rows keep their relative order; the rows freed at the top are
    /// emptied. Uses a two-pointer scan from the bottom without allocating.
    pub fn clear_full_rows_in(&mut self, rows: std::ops::Range<usize>) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = ROWS;

        for read_y in (0..ROWS).rev() {
            if rows.contains(&read_y) && self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Clear every full row on the grid
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        self.clear_full_rows_in(0..ROWS)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [None; GRID_SIZE];
    }

    /// Copy into a `u8` matrix (0 = empty, otherwise the color code)
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; ROWS]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, dst) in row.iter_mut().enumerate() {
                *dst = self.cells[y * BOARD_WIDTH as usize + x].map_or(0, ColorTag::code);
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
