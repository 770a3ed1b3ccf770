//! Board module - settled blocks and the derived playfield grid
//!
//! The source of truth is the sparse map of locked cells, keyed by `(x, y)`.
//! The 10x20 grid is a flat, row-major view derived from that map and fully
//! recomputed after every structural change; it is never edited directly.
//! Coordinates: x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the field (y < 0) exist only for falling pieces.

use std::collections::HashMap;

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, Rgb, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Result of committing a piece to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// The piece came to rest with a cell above the visible field; nothing was inserted
    ToppedOut,
    /// The piece was inserted and `lines_cleared` full rows were removed
    Locked { lines_cleared: u32 },
}

/// The playfield
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    locked: HashMap<(i8, i8), Rgb>,
    grid: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            locked: HashMap::new(),
            grid: [None; BOARD_SIZE],
        }
    }

    /// Create a board from already settled cells
    ///
    /// Cells outside the visible field are kept in the map but never shown.
    pub fn with_locked(cells: impl IntoIterator<Item = ((i8, i8), Rgb)>) -> Self {
        let mut board = Self {
            locked: cells.into_iter().collect(),
            grid: [None; BOARD_SIZE],
        };
        board.rebuild_grid();
        board
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
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

    /// Grid cell at `(x, y)`, `None` when out of bounds
    pub fn cell(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.grid[idx])
    }

    /// Check if `(x, y)` is inside the field and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.cell(x, y), Some(Some(_)))
    }

    /// The derived grid, row-major
    pub fn grid(&self) -> &[Cell] {
        &self.grid
    }

    /// Grid row `y` (0..20)
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * BOARD_WIDTH as usize;
        &self.grid[start..start + BOARD_WIDTH as usize]
    }

    /// The settled cells
    pub fn locked(&self) -> &HashMap<(i8, i8), Rgb> {
        &self.locked
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT as usize && self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Check whether `piece` moved by `(dx, dy)` fits
    ///
    /// Columns must stay in `0..10` and rows below `20`. Cells in rows above
    /// the field are always passable; cells inside it must be empty.
    pub fn is_valid_placement(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece.cells().iter().all(|&(x, y)| {
            let (x, y) = (x + dx, y + dy);
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return false;
            }
            y < 0 || !self.is_occupied(x, y)
        })
    }

    /// Commit `piece` to the board and clear any completed rows
    pub fn lock_piece(&mut self, piece: &Piece) -> LockOutcome {
        let cells = piece.cells();
        if cells.iter().any(|&(_, y)| y < 0) {
            return LockOutcome::ToppedOut;
        }

        for (x, y) in cells {
            self.locked.insert((x, y), piece.color);
        }
        self.rebuild_grid();

        LockOutcome::Locked {
            lines_cleared: self.clear_lines(),
        }
    }

    /// Remove every full row and drop the rows above it
    ///
    /// Each surviving cell moves down by the number of cleared rows beneath
    /// it, so simultaneous clears of non-adjacent rows stay consistent.
    /// Returns the number of rows cleared.
    pub fn clear_lines(&mut self) -> u32 {
        let full: ArrayVec<i8, { BOARD_HEIGHT as usize }> = (0..BOARD_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .map(|y| y as i8)
            .collect();

        if full.is_empty() {
            return 0;
        }

        self.locked = std::mem::take(&mut self.locked)
            .into_iter()
            .filter(|((_, y), _)| !full.contains(y))
            .map(|((x, y), color)| {
                let below = full.iter().filter(|&&line| line > y).count() as i8;
                ((x, y + below), color)
            })
            .collect();
        self.rebuild_grid();

        full.len() as u32
    }

    /// Remove every locked cell
    pub fn clear(&mut self) {
        self.locked.clear();
        self.grid = [None; BOARD_SIZE];
    }

    fn rebuild_grid(&mut self) {
        self.grid = [None; BOARD_SIZE];
        for (&(x, y), &color) in &self.locked {
            if let Some(idx) = Self::index(x, y) {
                self.grid[idx] = Some(color);
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    const GRAY: Rgb = Rgb::new(128, 128, 128);

    fn filled_row(y: i8) -> impl Iterator<Item = ((i8, i8), Rgb)> {
        (0..BOARD_WIDTH as i8).map(move |x| ((x, y), GRAY))
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
        assert_eq!(Board::index(0, -1), None);
    }

    #[test]
    fn test_grid_mirrors_locked_cells() {
        let board = Board::with_locked([((3, 4), GRAY), ((0, -1), GRAY)]);
        assert_eq!(board.cell(3, 4), Some(Some(GRAY)));
        assert_eq!(board.grid().iter().filter(|c| c.is_some()).count(), 1);
        assert_eq!(board.locked().len(), 2);
    }

    #[test]
    fn test_placement_above_field_ignores_occupancy_but_not_walls() {
        let board = Board::new();
        let piece = Piece::new(ShapeKind::I, 0, -4);
        assert!(board.is_valid_placement(&piece, 0, 0));
        assert!(!board.is_valid_placement(&piece, -2, 0));
        assert!(board.is_valid_placement(&piece, -1, 0));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::with_locked(
            filled_row(17)
                .chain(filled_row(19))
                .chain([((4, 18), GRAY), ((2, 16), GRAY)]),
        );

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.locked().len(), 2);
        // Row 18 had one full row beneath it, row 16 had two.
        assert!(board.is_occupied(4, 19));
        assert!(board.is_occupied(2, 18));
    }

    #[test]
    fn test_clear_lines_without_full_rows_is_noop() {
        let mut board = Board::with_locked([((0, 19), GRAY)]);
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_topped_out_lock_inserts_nothing() {
        let mut board = Board::new();
        let piece = Piece::new(ShapeKind::I, 0, -3);
        assert_eq!(board.lock_piece(&piece), LockOutcome::ToppedOut);
        assert!(board.locked().is_empty());
    }
}
