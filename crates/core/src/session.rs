//! Session module - the game controller
//!
//! Ties the board, the falling piece, the shape source and scoring together.
//! The frame loop calls [`GameSession::tick`] once per frame with a
//! millisecond timestamp and an [`InputFrame`]; every repeat delay and the
//! gravity interval are plain differences against stored timestamps.
//!
//! Locking and line clearing finish inside the tick that triggers them, so
//! the observable phases are only [`Phase::Playing`], [`Phase::Paused`] and
//! [`Phase::GameOver`].

use std::ops::ControlFlow;

use arrayvec::ArrayVec;

use crate::board::{Board, LockOutcome};
use crate::piece::Piece;
use crate::rng::{ShapeSource, SimpleRng};
use crate::scoring::{drop_interval_ms, drop_points, level_for_lines, score_lock};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{Cue, InputFrame, Key, MOVE_REPEAT_MS, SOFT_DROP_REPEAT_MS};

/// Fallback offsets tried, in order, when a rotation does not fit in place
const WALL_KICKS: [(i8, i8); 3] = [(1, 0), (-1, 0), (0, -1)];

/// Pending cue capacity; a tick emits far fewer, overflow is dropped
const CUE_CAPACITY: usize = 32;

/// Observable session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// Last time each repeatable key fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RepeatTimers {
    left: u64,
    right: u64,
    down: u64,
}

impl RepeatTimers {
    fn at(now_ms: u64) -> Self {
        Self {
            left: now_ms,
            right: now_ms,
            down: now_ms,
        }
    }
}

/// Everything a reset replaces
#[derive(Debug, Clone)]
struct SessionState {
    board: Board,
    current: Piece,
    next: Piece,
    score: u32,
    lines: u32,
    level: u32,
    combo: u32,
    drop_interval_ms: u32,
    last_drop_ms: u64,
    last_score_ms: Option<u64>,
    repeat: RepeatTimers,
    paused: bool,
    game_over: bool,
}

impl SessionState {
    fn fresh(board: Board, source: &mut impl ShapeSource, now_ms: u64) -> Self {
        let current = Piece::spawn(source.next_shape());
        let next = Piece::spawn(source.next_shape());
        Self {
            board,
            current,
            next,
            score: 0,
            lines: 0,
            level: 1,
            combo: 0,
            drop_interval_ms: drop_interval_ms(1),
            last_drop_ms: now_ms,
            last_score_ms: None,
            repeat: RepeatTimers::at(now_ms),
            paused: false,
            game_over: false,
        }
    }
}

/// A single game, from first spawn to game over and any number of resets
pub struct GameSession<S = SimpleRng> {
    source: S,
    state: SessionState,
    cues: ArrayVec<Cue, CUE_CAPACITY>,
    now_ms: u64,
}

impl GameSession<SimpleRng> {
    /// Uniformly random shapes from a seeded generator
    pub fn with_seed(seed: u32, now_ms: u64) -> Self {
        Self::new(SimpleRng::new(seed), now_ms)
    }
}

impl<S: ShapeSource> GameSession<S> {
    /// Start a game on an empty board
    pub fn new(source: S, now_ms: u64) -> Self {
        Self::from_board(source, Board::new(), now_ms)
    }

    /// Start a game on a board with pre-settled cells
    ///
    /// The first pieces are spawn-checked against `board`, so a blocked spawn
    /// area ends the game immediately.
    pub fn from_board(mut source: S, board: Board, now_ms: u64) -> Self {
        let state = SessionState::fresh(board, &mut source, now_ms);
        let mut session = Self {
            source,
            state,
            cues: ArrayVec::new(),
            now_ms,
        };
        if !session.fits(&session.state.current) || !session.fits(&session.state.next) {
            session.end_game();
        }
        session
    }

    /// Advance the game by one frame
    ///
    /// Quit, pause and restart are honored in every phase. Everything else is
    /// skipped while paused or after game over. Returns `Break` on quit.
    pub fn tick(&mut self, now_ms: u64, input: &InputFrame) -> ControlFlow<()> {
        self.now_ms = now_ms;

        if input.just_pressed(Key::Quit) {
            return ControlFlow::Break(());
        }
        if input.just_pressed(Key::Pause) {
            self.toggle_pause();
        }
        if input.just_pressed(Key::Restart) {
            self.reset(now_ms);
        }

        if !self.is_playable() {
            return ControlFlow::Continue(());
        }
        self.apply_presses(now_ms, input);

        if !self.is_playable() {
            return ControlFlow::Continue(());
        }
        self.apply_held(now_ms, input);

        if !self.is_playable() {
            return ControlFlow::Continue(());
        }
        self.apply_gravity(now_ms);

        ControlFlow::Continue(())
    }

    fn apply_presses(&mut self, now_ms: u64, input: &InputFrame) {
        if input.just_pressed(Key::Left) {
            self.shift(-1);
            self.state.repeat.left = now_ms;
        }
        if input.just_pressed(Key::Right) {
            self.shift(1);
            self.state.repeat.right = now_ms;
        }
        if input.just_pressed(Key::Down) {
            self.state.repeat.down = now_ms;
        }
        if input.just_pressed(Key::Up) {
            self.rotate();
        }
        if input.just_pressed(Key::Space) {
            self.hard_drop();
        }
    }

    fn apply_held(&mut self, now_ms: u64, input: &InputFrame) {
        let repeat = self.state.repeat;

        if input.is_down(Key::Left)
            && now_ms.saturating_sub(repeat.left) > MOVE_REPEAT_MS
            && self.try_translate(-1, 0)
        {
            self.state.repeat.left = now_ms;
        }
        if input.is_down(Key::Right)
            && now_ms.saturating_sub(repeat.right) > MOVE_REPEAT_MS
            && self.try_translate(1, 0)
        {
            self.state.repeat.right = now_ms;
        }
        if input.is_down(Key::Down)
            && now_ms.saturating_sub(repeat.down) > SOFT_DROP_REPEAT_MS
            && self.soft_drop()
        {
            self.state.repeat.down = now_ms;
        }
    }

    fn apply_gravity(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.state.last_drop_ms);
        if elapsed <= u64::from(self.state.drop_interval_ms) {
            return;
        }
        self.state.last_drop_ms = now_ms;
        if !self.try_translate(0, 1) {
            self.lock_current_piece();
        }
    }

    /// Draw a fresh piece at the spawn position
    ///
    /// Ends the game if the piece does not fit where it spawns.
    pub fn spawn_piece(&mut self) -> Piece {
        let piece = Piece::spawn(self.source.next_shape());
        if !self.fits(&piece) {
            self.end_game();
        }
        piece
    }

    /// Move the current piece one column; emits [`Cue::Move`] on success
    pub fn shift(&mut self, dx: i8) -> bool {
        let moved = self.is_playable() && self.try_translate(dx, 0);
        if moved {
            self.emit(Cue::Move);
        }
        moved
    }

    /// Move the current piece down one row for one point
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.is_playable() && self.try_translate(0, 1);
        if moved {
            self.state.score = self.state.score.saturating_add(drop_points(1, false));
        }
        moved
    }

    /// Rotate clockwise, falling back to a right, left or upward nudge
    ///
    /// If no candidate fits the piece is left exactly as it was. Returns
    /// whether the rotation state changed.
    pub fn rotate(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }

        let before = self.state.current;
        let mut piece = before;
        piece.rotate_forward();

        let board = &self.state.board;
        if !board.is_valid_placement(&piece, 0, 0) {
            match WALL_KICKS
                .into_iter()
                .find(|&(dx, dy)| board.is_valid_placement(&piece, dx, dy))
            {
                Some((dx, dy)) => piece.translate(dx, dy),
                None => piece = before,
            }
        }

        self.state.current = piece;
        let rotated = piece.rotation != before.rotation;
        if rotated {
            self.emit(Cue::Rotate);
        }
        rotated
    }

    /// Drop the current piece as far as it goes and lock it
    ///
    /// Returns the number of rows travelled.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.is_playable() {
            return 0;
        }

        let mut rows = 0;
        while self.try_translate(0, 1) {
            rows += 1;
        }
        self.state.score = self.state.score.saturating_add(drop_points(rows, true));
        self.lock_current_piece();
        self.emit(Cue::HardDropLand);
        rows
    }

    /// Commit the current piece, score the lock and bring in the next piece
    ///
    /// Does nothing while paused or after game over.
    pub fn lock_current_piece(&mut self) {
        if !self.is_playable() {
            return;
        }
        let piece = self.state.current;
        let lines_cleared = match self.state.board.lock_piece(&piece) {
            LockOutcome::ToppedOut => {
                self.end_game();
                return;
            }
            LockOutcome::Locked { lines_cleared } => lines_cleared,
        };

        let state = &mut self.state;
        state.combo = if lines_cleared > 0 { state.combo + 1 } else { 0 };

        let result = score_lock(lines_cleared, state.level, state.combo);
        state.score = state.score.saturating_add(result.total);
        if result.total > 0 {
            state.last_score_ms = Some(self.now_ms);
        }

        state.lines += lines_cleared;
        state.level = level_for_lines(state.lines);
        state.drop_interval_ms = drop_interval_ms(state.level);

        tracing::debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            lines_cleared,
            score = state.score,
            combo = state.combo,
            "piece locked"
        );

        if lines_cleared > 0 {
            self.emit(Cue::LineClear);
        }

        self.state.current = self.state.next;
        if !self.fits(&self.state.current) {
            self.end_game();
        }
        self.state.next = self.spawn_piece();
    }

    /// Where the current piece would land, if below where it is now
    pub fn ghost(&self) -> Option<Piece> {
        let current = self.state.current;
        let mut ghost = current;
        while self.state.board.is_valid_placement(&ghost, 0, 1) {
            ghost.translate(0, 1);
        }
        (ghost.y > current.y).then_some(ghost)
    }

    /// Toggle pause; ignored after game over
    ///
    /// Resuming restarts the gravity clock so the piece does not fall the
    /// instant play continues.
    pub fn toggle_pause(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.paused = !self.state.paused;
        if !self.state.paused {
            self.state.last_drop_ms = self.now_ms;
        }
    }

    /// Replace the whole session state with a fresh game
    ///
    /// The shape source carries on with its stream; pending cues are kept.
    pub fn reset(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.state = SessionState::fresh(Board::new(), &mut self.source, now_ms);
        tracing::info!("session reset");
    }

    /// Replace the current piece, if `piece` fits on the board
    ///
    /// Rejected while paused or after game over.
    pub fn place_current(&mut self, piece: Piece) -> bool {
        if !self.is_playable() || !self.fits(&piece) {
            return false;
        }
        self.state.current = piece;
        true
    }

    /// Cues emitted since the previous drain
    pub fn drain_cues(&mut self) -> impl Iterator<Item = Cue> + '_ {
        self.cues.drain(..)
    }

    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn snapshot_into(&self, now_ms: u64, out: &mut GameSnapshot) {
        for (y, row) in out.board.iter_mut().enumerate() {
            row.copy_from_slice(self.state.board.row(y));
        }
        out.current = PieceSnapshot::from(&self.state.current);
        out.next = PieceSnapshot::from(&self.state.next);
        out.ghost = if self.state.game_over {
            None
        } else {
            self.ghost().map(PieceSnapshot::from)
        };
        out.score = self.state.score;
        out.level = self.state.level;
        out.lines = self.state.lines;
        out.combo = self.state.combo;
        out.paused = self.state.paused;
        out.game_over = self.state.game_over;
        out.ms_since_score = self
            .state
            .last_score_ms
            .map(|at| now_ms.saturating_sub(at));
    }

    /// Snapshot as of the latest tick
    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(self.now_ms, &mut s);
        s
    }

    pub fn phase(&self) -> Phase {
        if self.state.game_over {
            Phase::GameOver
        } else if self.state.paused {
            Phase::Paused
        } else {
            Phase::Playing
        }
    }

    pub fn is_playable(&self) -> bool {
        !self.state.game_over && !self.state.paused
    }

    pub fn paused(&self) -> bool {
        self.state.paused
    }

    pub fn game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn lines(&self) -> u32 {
        self.state.lines
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.state.drop_interval_ms
    }

    pub fn current(&self) -> &Piece {
        &self.state.current
    }

    pub fn next(&self) -> &Piece {
        &self.state.next
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fits(&self, piece: &Piece) -> bool {
        self.state.board.is_valid_placement(piece, 0, 0)
    }

    fn try_translate(&mut self, dx: i8, dy: i8) -> bool {
        if !self.state.board.is_valid_placement(&self.state.current, dx, dy) {
            return false;
        }
        self.state.current.translate(dx, dy);
        true
    }

    fn end_game(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.game_over = true;
        self.emit(Cue::GameOver);
        tracing::info!(
            score = self.state.score,
            lines = self.state.lines,
            level = self.state.level,
            "game over"
        );
    }

    fn emit(&mut self, cue: Cue) {
        let _ = self.cues.try_push(cue);
    }
}

impl Default for GameSession<SimpleRng> {
    fn default() -> Self {
        Self::with_seed(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedShapes;
    use crate::types::{Rgb, ShapeKind, BOARD_WIDTH};

    const GRAY: Rgb = Rgb::new(128, 128, 128);

    fn o_session() -> GameSession<ScriptedShapes> {
        GameSession::new(ScriptedShapes::new([ShapeKind::O]), 0)
    }

    /// Row 19 filled everywhere except the columns an O at spawn covers
    fn o_gap_board() -> Board {
        Board::with_locked(
            (0..BOARD_WIDTH as i8)
                .filter(|x| !(7..=8).contains(x))
                .map(|x| ((x, 19), GRAY)),
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::with_seed(12345, 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.drop_interval_ms(), 500);
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.board().locked().is_empty());
        assert!(session.pending_cues().is_empty());
    }

    #[test]
    fn test_single_clear_at_level_two_scores_200() {
        let mut session = GameSession::from_board(
            ScriptedShapes::new([ShapeKind::O]),
            o_gap_board(),
            0,
        );
        session.state.lines = 10;
        session.state.level = 2;

        let rows = session.hard_drop();
        assert_eq!(session.score(), drop_points(rows, true) + 200);
        assert_eq!(session.lines(), 11);
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut session = GameSession::from_board(
            ScriptedShapes::new([ShapeKind::O]),
            o_gap_board(),
            0,
        );
        session.state.lines = 9;

        session.hard_drop();
        assert_eq!(session.lines(), 10);
        assert_eq!(session.level(), 2);
        assert_eq!(session.drop_interval_ms(), 480);
    }

    #[test]
    fn test_non_clearing_lock_resets_combo() {
        let mut session = o_session();
        session.state.combo = 3;
        session.hard_drop();
        assert_eq!(session.combo(), 0);
        assert_eq!(session.state.last_score_ms, None);
    }

    #[test]
    fn test_gravity_needs_strictly_more_than_interval() {
        let mut session = o_session();
        let y = session.current().y;

        session.tick(500, &InputFrame::new());
        assert_eq!(session.current().y, y);

        session.tick(501, &InputFrame::new());
        assert_eq!(session.current().y, y + 1);

        session.tick(1001, &InputFrame::new());
        assert_eq!(session.current().y, y + 1);
        session.tick(1002, &InputFrame::new());
        assert_eq!(session.current().y, y + 2);
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut session = o_session();
        assert!(session.place_current(Piece::new(ShapeKind::O, 0, 16)));

        session.tick(501, &InputFrame::new());
        assert_eq!(session.board().locked().len(), 4);
        assert_eq!(session.current().y, Piece::spawn(ShapeKind::O).y);
    }

    #[test]
    fn test_resume_restarts_gravity_clock() {
        let mut session = o_session();
        session.tick(10, &InputFrame::new().with_pressed(Key::Pause));
        assert!(session.paused());

        let y = session.current().y;
        session.tick(2000, &InputFrame::new().with_pressed(Key::Pause));
        assert!(!session.paused());
        session.tick(2400, &InputFrame::new());
        assert_eq!(session.current().y, y);
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut session = o_session();
        session.end_game();
        session.toggle_pause();
        assert!(!session.paused());
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_end_game_emits_single_cue() {
        let mut session = o_session();
        session.end_game();
        session.end_game();
        let cues: Vec<Cue> = session.drain_cues().collect();
        assert_eq!(cues, vec![Cue::GameOver]);
    }

    #[test]
    fn test_score_timestamp_tracks_line_clears() {
        let mut session = GameSession::from_board(
            ScriptedShapes::new([ShapeKind::O]),
            o_gap_board(),
            0,
        );
        session.tick(40, &InputFrame::new().with_pressed(Key::Space));
        assert_eq!(session.state.last_score_ms, Some(40));

        let snap = {
            let mut s = GameSnapshot::default();
            session.snapshot_into(240, &mut s);
            s
        };
        assert_eq!(snap.ms_since_score, Some(200));
        assert!(snap.score_flash());
    }
}
