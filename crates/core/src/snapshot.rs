use crate::piece::Piece;
use crate::types::{Cell, Rgb, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, SCORE_FLASH_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub x: i8,
    pub y: i8,
    pub rotation: usize,
    pub color: Rgb,
    /// Absolute board cells
    pub cells: [(i8, i8); 4],
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            rotation: value.rotation,
            color: value.color,
            cells: value.cells(),
        }
    }
}

impl From<&Piece> for PieceSnapshot {
    fn from(value: &Piece) -> Self {
        Self::from(*value)
    }
}

/// Read-only view of a session for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current: PieceSnapshot,
    pub next: PieceSnapshot,
    pub ghost: Option<PieceSnapshot>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Milliseconds since the score last rose from a line clear, if ever
    pub ms_since_score: Option<u64>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Whether the score should currently be emphasized
    pub fn score_flash(&self) -> bool {
        matches!(self.ms_since_score, Some(ms) if ms < SCORE_FLASH_MS)
    }

    /// Count of filled grid cells
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let idle = PieceSnapshot::from(Piece::spawn(ShapeKind::O));
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: idle,
            next: idle,
            ghost: None,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            paused: false,
            game_over: false,
            ms_since_score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_flash_window() {
        let mut snap = GameSnapshot::default();
        assert!(!snap.score_flash());
        snap.ms_since_score = Some(0);
        assert!(snap.score_flash());
        snap.ms_since_score = Some(SCORE_FLASH_MS - 1);
        assert!(snap.score_flash());
        snap.ms_since_score = Some(SCORE_FLASH_MS);
        assert!(!snap.score_flash());
    }

    #[test]
    fn piece_snapshot_carries_absolute_cells() {
        let piece = Piece::new(ShapeKind::O, 0, 0);
        let snap = PieceSnapshot::from(&piece);
        assert_eq!(snap.cells, [(2, 2), (3, 2), (2, 3), (3, 3)]);
        assert_eq!(snap.color, piece.color);
    }
}
