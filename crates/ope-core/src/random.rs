//! Seedable randomness for reproducible evaluation.
//!
//! Every stochastic step in the estimators (online start-point draws,
//! Beta imputation, batch shuffling) goes through [`EvalRng`]; nothing
//! reads ambient global RNG state. Two runs with the same `Seed` produce
//! identical results.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use ope_math::beta_quantile;

/// How an evaluator's random generator is initialized.
pub enum RandomState {
    /// Deterministic generator seeded from an integer.
    Seed(u64),
    /// Fresh generator from OS entropy; runs are not reproducible.
    Unseeded,
    /// Caller-supplied generator, used as-is.
    Generator(StdRng),
}

impl Default for RandomState {
    fn default() -> Self {
        RandomState::Seed(1)
    }
}

impl RandomState {
    /// Resolve into a concrete generator with stable draw semantics.
    pub fn resolve(self) -> EvalRng {
        let rng = match self {
            RandomState::Seed(seed) => StdRng::seed_from_u64(seed),
            RandomState::Unseeded => StdRng::from_os_rng(),
            RandomState::Generator(rng) => rng,
        };
        EvalRng { rng }
    }
}

/// Resolved generator exposing the draw operations the estimators need.
pub struct EvalRng {
    rng: StdRng,
}

impl EvalRng {
    /// Uniform index in `[0, n)`. Panics if `n` is zero.
    pub fn uniform_index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }

    /// Beta(alpha, beta) variate by inverse-transform sampling.
    pub fn beta(&mut self, alpha: f64, beta: f64) -> f64 {
        let u = self.rng.random::<f64>();
        beta_quantile(u, alpha, beta)
    }

    /// Uniformly shuffled permutation of `0..n`.
    pub fn shuffled_order(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }
}
