use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::*;

/// Supplies the candies for new boards and refills.
pub trait CandySource {
    fn next_candy(&mut self) -> Candy;
}

impl<S: CandySource + ?Sized> CandySource for &mut S {
    fn next_candy(&mut self) -> Candy {
        (**self).next_candy()
    }
}

/// Uniform draws from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<SmallRng> {
    /// Reproducible source, the same seed yields the same candies.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> CandySource for RngSource<R> {
    fn next_candy(&mut self) -> Candy {
        Candy::ALL[self.rng.random_range(0..Candy::COUNT)]
    }
}

/// Replays a fixed sequence of candies, starting over once it runs out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedSource {
    script: Vec<Candy>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Candy>) -> Result<Self> {
        if script.is_empty() {
            return Err(CascadeError::EmptyScript);
        }
        Ok(Self { script, cursor: 0 })
    }

    /// Number of candies handed out so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl CandySource for ScriptedSource {
    fn next_candy(&mut self) -> Candy {
        let candy = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        candy
    }
}
