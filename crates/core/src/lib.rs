//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules, session state and simulation logic.
//! It performs no terminal or audio I/O: time arrives as a millisecond
//! timestamp, input as an [`InputFrame`](types::InputFrame), and side
//! effects leave as [`Cue`](types::Cue)s and [`GameSnapshot`]s.
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven shape kinds, their 5x5 rotation masks and colors
//! - [`piece`]: a falling piece (kind, position, rotation state)
//! - [`board`]: settled cells, the derived 10x20 grid, collision and line clears
//! - [`rng`]: injectable shape sources (uniform LCG, 7-bag, scripted)
//! - [`scoring`]: line clear, combo and drop points, level and gravity speed
//! - [`session`]: the per-frame controller tying everything together
//! - [`snapshot`]: read-only frame views for presentation
//!
//! # Example
//!
//! ```
//! use blockfall_core::rng::ScriptedShapes;
//! use blockfall_core::types::{InputFrame, Key, ShapeKind};
//! use blockfall_core::GameSession;
//!
//! let mut session = GameSession::new(ScriptedShapes::new([ShapeKind::O]), 0);
//!
//! // Hard drop the first piece onto the empty floor.
//! let input = InputFrame::new().with_pressed(Key::Space);
//! assert!(session.tick(16, &input).is_continue());
//!
//! // 18 rows at 2 points each, nothing cleared.
//! assert_eq!(session.score(), 36);
//! assert_eq!(session.board().locked().len(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::tick`] once per frame (60 FPS nominal). Gravity moves
//! the piece one row once strictly more than the level's interval has passed
//! since the previous gravity step: 500ms at level 1, 20ms faster per level,
//! never faster than 100ms.

pub mod board;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LockOutcome};
pub use piece::Piece;
pub use rng::{ScriptedShapes, SevenBag, ShapeSource, SimpleRng};
pub use session::{GameSession, Phase};
pub use snapshot::{GameSnapshot, PieceSnapshot};
