//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto logical [`Key`](types::Key)s and folds
//! them into one [`InputFrame`](types::InputFrame) per frame. Terminals that
//! never report key releases are handled with a release timeout.

pub mod map;
pub mod sampler;

pub use blockfall_types as types;

pub use map::map_key;
pub use sampler::{KeySampler, DEFAULT_KEY_RELEASE_TIMEOUT_MS};
