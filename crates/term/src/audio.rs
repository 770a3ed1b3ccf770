//! Cue players: turn session cues into audible feedback.
//!
//! Playback is best-effort. Failures are logged and never reach the game.

use std::io::Write;

use crate::types::Cue;

/// Default minimum cue volume for the terminal bell.
pub const DEFAULT_BELL_THRESHOLD: f32 = 0.45;

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);

    /// Called after the last cue of a frame.
    fn end_frame(&mut self) {}

    /// Play every cue emitted during one frame.
    fn play_frame(&mut self, cues: impl IntoIterator<Item = Cue>)
    where
        Self: Sized,
    {
        for cue in cues {
            self.play(cue);
        }
        self.end_frame();
    }
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell for loud enough cues, at most once per frame.
#[derive(Debug)]
pub struct BellPlayer<W: Write> {
    out: W,
    threshold: f32,
    rang: bool,
    broken: bool,
}

impl<W: Write> BellPlayer<W> {
    pub fn new(out: W, threshold: f32) -> Self {
        Self {
            out,
            threshold: threshold.clamp(0.0, 1.0),
            rang: false,
            broken: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self) -> std::io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

impl<W: Write> CuePlayer for BellPlayer<W> {
    fn play(&mut self, cue: Cue) {
        if self.broken || self.rang || cue.volume() < self.threshold {
            return;
        }
        self.rang = true;
        if let Err(error) = self.ring() {
            tracing::warn!(%error, cue = cue.as_str(), "terminal bell failed; muting");
            self.broken = true;
        }
    }

    fn end_frame(&mut self) {
        self.rang = false;
    }
}
