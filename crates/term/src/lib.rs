//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout frameworks and instead renders into a simple
//! framebuffer that is flushed to a crossterm backend.
//!
//! - [`fb`]: styled glyph framebuffer
//! - [`game_view`]: snapshot to framebuffer (pure, testable)
//! - [`renderer`]: terminal setup and diffing flush
//! - [`audio`]: cue players (silent, terminal bell)

pub mod audio;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use audio::{BellPlayer, CuePlayer, SilentPlayer, DEFAULT_BELL_THRESHOLD};
pub use fb::{FrameBuffer, Glyph, Style};
pub use game_view::{GameView, Palette, ViewConfig, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
