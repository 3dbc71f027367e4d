//! RNG module - deterministic randomness for capsule colors and pathogen layout
//!
//! A simple LCG keeps games reproducible from a seed (same seed, same
//! pathogens, same capsule sequence).

use crate::types::Color;

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

    /// Generate random value in range [0, max). `max == 0` yields 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }

    pub fn next_color(&mut self) -> Color {
        Color::from_index(self.next_range(Color::ALL.len() as u32) as usize)
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

/// Source of capsule color pairs with a one-capsule preview
#[derive(Debug, Clone)]
pub struct CapsuleQueue {
    next: (Color, Color),
    rng: SimpleRng,
}

impl CapsuleQueue {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = (rng.next_color(), rng.next_color());
        Self { next, rng }
    }

    /// Colors of the capsule the next [`draw`](Self::draw) returns
    pub fn peek(&self) -> (Color, Color) {
        self.next
    }

    pub fn draw(&mut self) -> (Color, Color) {
        let drawn = self.next;
        self.next = (self.rng.next_color(), self.rng.next_color());
        drawn
    }

    /// Current RNG state (seed for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for CapsuleQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
