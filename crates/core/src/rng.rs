//! RNG module - injectable shape sources
//!
//! The session never touches ambient randomness; it draws from a
//! [`ShapeSource`]. Three sources are provided:
//!
//! - [`SimpleRng`]: seedable LCG, uniform over the seven kinds (the default)
//! - [`SevenBag`]: shuffled bags of all seven kinds, drawn until empty
//! - [`ScriptedShapes`]: a fixed cycle, for puzzles, replays and tests

use crate::types::ShapeKind;

/// Supplies the kind of each newly spawned piece
pub trait ShapeSource {
    fn next_shape(&mut self) -> ShapeKind;
}

impl<S: ShapeSource + ?Sized> ShapeSource for &mut S {
    fn next_shape(&mut self) -> ShapeKind {
        (**self).next_shape()
    }
}

impl<S: ShapeSource + ?Sized> ShapeSource for Box<S> {
    fn next_shape(&mut self) -> ShapeKind {
        (**self).next_shape()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Takes the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current generator state
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ShapeSource for SimpleRng {
    fn next_shape(&mut self) -> ShapeKind {
        ShapeKind::from_index(self.next_range(ShapeKind::ALL.len() as u32) as usize)
    }
}

/// 7-bag generator: every run of seven draws contains each kind once
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: [ShapeKind; 7],
    index: usize,
    rng: SimpleRng,
}

impl SevenBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: ShapeKind::ALL,
            index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = ShapeKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.index = 0;
    }
}

impl ShapeSource for SevenBag {
    fn next_shape(&mut self) -> ShapeKind {
        if self.index >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.index];
        self.index += 1;
        kind
    }
}

/// Repeats a fixed sequence of kinds forever
#[derive(Debug, Clone)]
pub struct ScriptedShapes {
    script: Vec<ShapeKind>,
    index: usize,
}

impl ScriptedShapes {
    /// An empty script behaves like `[ShapeKind::O]`
    pub fn new(script: impl Into<Vec<ShapeKind>>) -> Self {
        let mut script = script.into();
        if script.is_empty() {
            script.push(ShapeKind::O);
        }
        Self { script, index: 0 }
    }
}

impl ShapeSource for ScriptedShapes {
    fn next_shape(&mut self) -> ShapeKind {
        let kind = self.script[self.index % self.script.len()];
        self.index = self.index.wrapping_add(1);
        kind
    }
}
