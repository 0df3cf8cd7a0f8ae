//! Random Sources
//!
//! Every stochastic decision in the crate draws through [`RandomSource`], so
//! the simulation can run on a seeded `SmallRng` while tests replay exact
//! draws with [`ScriptedRandom`].

use rand::{Rng, RngCore};

/// Minimal random interface used by progression and setup code.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32;

    /// Bernoulli trial: true iff a unit draw falls under `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        Rng::gen::<f64>(self)
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        Rng::gen_range(self, 0..bound)
    }
}

/// Replays a fixed list of unit draws. Once the list is exhausted the last
/// value repeats; an empty script draws 0.0.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            cursor: 0,
        }
    }

    /// A source that always draws `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of draws consumed so far.
    pub fn draws_taken(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        let value = match self.draws.len() {
            0 => 0.0,
            len => self.draws[self.cursor.min(len - 1)],
        };
        self.cursor += 1;
        value
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.unit() * bound as f64) as u32).min(bound - 1)
    }
}
