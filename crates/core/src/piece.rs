//! Piece module - a tetromino instance on the board

use crate::shapes::{color_of, rotation_states, Mask};
use crate::types::{Rgb, ShapeKind, SPAWN_X, SPAWN_Y};

/// A falling or previewed tetromino
///
/// Movement here never checks legality; the board decides what is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub x: i8,
    pub y: i8,
    /// Index into the kind's rotation states (kept in range)
    pub rotation: usize,
    pub color: Rgb,
}

impl Piece {
    /// Create a piece with its frame origin at `(x, y)` in rotation state 0
    pub fn new(kind: ShapeKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            x,
            y,
            rotation: 0,
            color: color_of(kind),
        }
    }

    /// Create a piece at the spawn position
    pub fn spawn(kind: ShapeKind) -> Self {
        Self::new(kind, SPAWN_X, SPAWN_Y)
    }

    /// Number of rotation states of this piece's kind
    pub fn state_count(&self) -> usize {
        rotation_states(self.kind).len()
    }

    /// Offsets of the current rotation state
    pub fn mask(&self) -> &'static Mask {
        let states = rotation_states(self.kind);
        &states[self.rotation % states.len()]
    }

    /// Absolute board coordinates of the four occupied cells
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.mask().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn translate(&mut self, dx: i8, dy: i8) {
        self.x += dx;
        self.y += dy;
    }

    /// Copy of this piece moved by `(dx, dy)`
    pub fn translated(mut self, dx: i8, dy: i8) -> Self {
        self.translate(dx, dy);
        self
    }

    /// Advance to the next rotation state (wraps)
    pub fn rotate_forward(&mut self) {
        self.rotation = (self.rotation + 1) % self.state_count();
    }

    /// Step back to the previous rotation state (wraps)
    pub fn rotate_back(&mut self) {
        let count = self.state_count();
        self.rotation = (self.rotation + count - 1) % count;
    }

    /// Topmost occupied row
    pub fn top(&self) -> i8 {
        self.cells().iter().map(|&(_, y)| y).min().unwrap_or(self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_uses_catalog_color() {
        let piece = Piece::new(ShapeKind::Z, 1, 2);
        assert_eq!(piece.rotation, 0);
        assert_eq!(piece.color, color_of(ShapeKind::Z));
        assert_eq!((piece.x, piece.y), (1, 2));
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(ShapeKind::T);
        assert_eq!((piece.x, piece.y), (SPAWN_X, SPAWN_Y));
        // T state 0 occupies frame rows 2 and 3, so it shows in rows 0 and 1.
        assert_eq!(piece.cells(), [(6, 0), (7, 0), (8, 0), (7, 1)]);
    }

    #[test]
    fn test_rotation_wraps_both_directions() {
        let mut piece = Piece::new(ShapeKind::T, 0, 0);
        piece.rotate_back();
        assert_eq!(piece.rotation, 3);
        piece.rotate_forward();
        assert_eq!(piece.rotation, 0);

        let mut o = Piece::new(ShapeKind::O, 0, 0);
        o.rotate_forward();
        assert_eq!(o.rotation, 0);
        o.rotate_back();
        assert_eq!(o.rotation, 0);
    }

    #[test]
    fn test_translate_and_top() {
        let mut piece = Piece::new(ShapeKind::I, 0, 0);
        piece.rotate_forward();
        assert_eq!(piece.top(), 0);
        piece.translate(2, -3);
        assert_eq!(piece.top(), -3);
        assert_eq!(piece.cells()[0], (4, -3));
    }

    #[test]
    fn test_copies_are_independent() {
        let piece = Piece::spawn(ShapeKind::L);
        let mut ghost = piece;
        ghost.translate(0, 5);
        assert_eq!(piece.y, SPAWN_Y);
        assert_eq!(ghost.y, SPAWN_Y + 5);
        assert_eq!(piece.translated(0, 5), ghost);
    }
}
