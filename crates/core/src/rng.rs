//! RNG module - seeded shape generation
//!
//! Shapes are drawn uniformly from the catalog with a small LCG so that a seed
//! reproduces the exact piece sequence on every platform. A [`ShapeFeed`]
//! either draws fresh shapes or plays back a recorded spawn sequence.

use crate::catalog::random_shape;
use crate::replay::SpawnCursor;
use crate::types::ShapeKind;

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
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Where the board gets its upcoming shapes from
#[derive(Debug, Clone)]
pub enum ShapeFeed {
    /// Fresh uniform draws
    Random(SimpleRng),
    /// Shapes recorded by an earlier session, in order
    Recorded(SpawnCursor),
}

impl ShapeFeed {
    pub fn seeded(seed: u32) -> Self {
        ShapeFeed::Random(SimpleRng::new(seed))
    }

    /// Next shape, or `None` once a recorded feed runs dry
    pub fn next_shape(&mut self) -> Option<ShapeKind> {
        match self {
            ShapeFeed::Random(rng) => Some(random_shape(rng)),
            ShapeFeed::Recorded(cursor) => cursor.next_spawn(),
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, ShapeFeed::Recorded(_))
    }
}
