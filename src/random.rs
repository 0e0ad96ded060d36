use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Source of the uniform draws behind every random choice and probabilistic
/// insertion in the pipeline.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// True with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Pick one element uniformly.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Result<&'a T> {
    if items.is_empty() {
        return Err(Error::EmptyChoice);
    }
    Ok(&items[rng.pick_index(items.len())])
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Always yields the same value. `ConstantRandom(0.0)` fires every chance and
/// picks the first alternative; values near 1.0 fire nothing and pick the last.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
