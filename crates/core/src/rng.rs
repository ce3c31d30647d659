//! RNG module - seeded piece generation and the next-queue preview
//!
//! Two randomizers are available:
//! - **Uniform**: every draw is an independent uniform pick of the 7 kinds. Long
//!   streaks of the same kind can happen.
//! - **Bag**: the "7-bag" used in modern Tetris. Each bag holds one of each kind,
//!   shuffled, and is dealt out before a new one is shuffled.
//!
//! Both run on a small LCG so a seed always replays the same sequence.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, MAX_PREVIEW};

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
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by multiply-shift so the result comes from the high bits; the low bits
    /// of a power-of-two LCG cycle quickly.
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

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// How upcoming piece kinds are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Randomizer {
    #[default]
    Uniform,
    Bag,
}

/// Piece generator with a fixed-depth preview
#[derive(Debug, Clone)]
pub struct PieceQueue {
    randomizer: Randomizer,
    /// Current bag of pieces (Bag randomizer only)
    bag: [PieceKind; 7],
    /// Index into current bag; 7 means exhausted
    bag_index: usize,
    rng: SimpleRng,
    /// Upcoming kinds, front is the next to spawn
    preview: ArrayVec<PieceKind, MAX_PREVIEW>,
}

impl PieceQueue {
    /// Create a queue; `preview_len` is clamped to `1..=MAX_PREVIEW`
    pub fn new(seed: u32, randomizer: Randomizer, preview_len: usize) -> Self {
        let mut queue = Self {
            randomizer,
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
            preview: ArrayVec::new(),
        };
        let depth = preview_len.clamp(1, MAX_PREVIEW);
        while queue.preview.len() < depth {
            let kind = queue.generate();
            queue.preview.push(kind);
        }
        queue
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    fn generate(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => {
                PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
            }
            Randomizer::Bag => {
                if self.bag_index >= self.bag.len() {
                    self.refill_bag();
                }
                let piece = self.bag[self.bag_index];
                self.bag_index += 1;
                piece
            }
        }
    }

    /// Next kind to spawn
    pub fn peek(&self) -> PieceKind {
        self.preview[0]
    }

    /// All previewed kinds, next first
    pub fn preview(&self) -> &[PieceKind] {
        &self.preview
    }

    /// Consume the next kind and top the preview back up
    pub fn draw(&mut self) -> PieceKind {
        let piece = self.preview.remove(0);
        let fresh = self.generate();
        self.preview.push(fresh);
        piece
    }

    /// Get the current RNG state (for restarting game with same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1, Randomizer::Uniform, 1)
    }
}
