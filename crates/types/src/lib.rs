//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the game engine, the input sampler and the terminal presentation alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: column 5, row -2 (the 5x5 shape frame starts above
//!   the visible field)
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_RATE` | 60 | Target frames per second |
//! | `INITIAL_DROP_MS` | 500 | Gravity interval at level 1 |
//! | `SPEED_FACTOR_MS` | 20 | Gravity speed-up per level |
//! | `MIN_DROP_MS` | 100 | Fastest gravity interval |
//! | `MOVE_REPEAT_MS` | 100 | Held left/right re-fire cadence |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Held down re-fire cadence |
//! | `SCORE_FLASH_MS` | 500 | Score emphasis after an increase |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Cue, InputFrame, Key, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeKind::from_index(4), ShapeKind::T);
//! assert_eq!(ShapeKind::T.as_str(), "t");
//!
//! let frame = InputFrame::new().with_pressed(Key::Space);
//! assert!(frame.just_pressed(Key::Space));
//! assert!(!frame.is_down(Key::Left));
//!
//! assert!(Cue::GameOver.volume() > Cue::Move.volume());
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the spawn frame origin
pub const SPAWN_X: i8 = 5;

/// Row of the spawn frame origin (above the visible field)
pub const SPAWN_Y: i8 = -2;

/// Target frame rate of the game loop
pub const FRAME_RATE: u32 = 60;

/// Gravity interval at level 1 (ms per row)
pub const INITIAL_DROP_MS: u32 = 500;

/// Gravity interval reduction per level (ms)
pub const SPEED_FACTOR_MS: u32 = 20;

/// Fastest gravity interval (ms per row)
pub const MIN_DROP_MS: u32 = 100;

/// Held left/right re-fire delay (ms)
pub const MOVE_REPEAT_MS: u64 = 100;

/// Held down re-fire delay (ms), half the lateral delay
pub const SOFT_DROP_REPEAT_MS: u64 = MOVE_REPEAT_MS / 2;

/// How long the score stays emphasized after it increases (ms)
pub const SCORE_FLASH_MS: u64 = 500;

/// Points per row of soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row of hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Base line clear points by rows cleared (index 0 unused), multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo bonus per combo step, multiplied by combo and level
pub const COMBO_POINTS: u32 = 50;

/// Lines per level
pub const LINES_PER_LEVEL: u32 = 10;

/// The seven tetromino kinds, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    S,
    Z,
    J,
    L,
    T,
    O,
    I,
}

impl ShapeKind {
    /// Every kind, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::T,
        ShapeKind::O,
        ShapeKind::I,
    ];

    /// Kind at catalog position `index` (taken modulo 7)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Catalog position of this kind
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::T => "t",
            ShapeKind::O => "o",
            ShapeKind::I => "i",
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by `num / den`, saturating at 255
    pub const fn scaled(self, num: u16, den: u16) -> Self {
        const fn channel(v: u8, num: u16, den: u16) -> u8 {
            let den = if den == 0 { 1 } else { den };
            let scaled = (v as u32 * num as u32) / den as u32;
            if scaled > 255 {
                255
            } else {
                scaled as u8
            }
        }
        Self {
            r: channel(self.r, num, den),
            g: channel(self.g, num, den),
            b: channel(self.b, num, den),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// A grid cell: `None` is empty, `Some` holds the settled block color
pub type Cell = Option<Rgb>;

/// Discrete audio cue emitted by the game session
///
/// Cues are fire-and-forget. A missing or failing player must not affect
/// game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Rotate,
    LineClear,
    HardDropLand,
    GameOver,
}

impl Cue {
    /// Nominal playback volume (0.0..=1.0)
    pub fn volume(&self) -> f32 {
        match self {
            Cue::Move => 0.2,
            Cue::Rotate => 0.3,
            Cue::LineClear => 0.5,
            Cue::HardDropLand => 0.4,
            Cue::GameOver => 0.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Rotate => "rotate",
            Cue::LineClear => "lineClear",
            Cue::HardDropLand => "hardDropLand",
            Cue::GameOver => "gameOver",
        }
    }
}

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Space,
    Pause,
    Restart,
    Quit,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Left,
        Key::Right,
        Key::Down,
        Key::Up,
        Key::Space,
        Key::Pause,
        Key::Restart,
        Key::Quit,
    ];

    /// Keys whose held state drives repeats (lateral moves and soft drop)
    pub fn repeats(self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Down)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Per-frame input snapshot
///
/// `is_down` reports keys currently held, `just_pressed` reports keys whose
/// press edge happened since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    down: u8,
    pressed: u8,
}

impl InputFrame {
    pub const fn new() -> Self {
        Self {
            down: 0,
            pressed: 0,
        }
    }

    /// Mark `key` as held this frame
    pub fn hold(&mut self, key: Key) {
        self.down |= key.bit();
    }

    /// Mark `key` as released
    pub fn release(&mut self, key: Key) {
        self.down &= !key.bit();
    }

    /// Record a press edge for `key`
    pub fn press(&mut self, key: Key) {
        self.pressed |= key.bit();
    }

    pub fn with_held(mut self, key: Key) -> Self {
        self.hold(key);
        self
    }

    pub fn with_pressed(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down & key.bit() != 0
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed & key.bit() != 0
    }

    pub fn clear_pressed(&mut self) {
        self.pressed = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.down == 0 && self.pressed == 0
    }
}
