//! Random sampling primitives.
//!
//! Every stochastic decision in a run flows through a single [`Sampler`],
//! which owns the run's pseudorandom stream. Reproduction algorithms never
//! touch a global generator, so independent simulations in the same process
//! stay reproducible from their seeds.
//!
//! The weighted-multinomial draw operates on a [`ProbabilityTable`]: an
//! insertion-ordered list of mutation classes and their probabilities.

use crate::errors::{Result, SimulationError, MIN_TABLE_TOTAL};
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution, Poisson};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::trace;

/// Discrete distribution over mutation classes, kept in insertion order.
///
/// Probabilities are not required to sum to exactly one: floating-point
/// accumulation leaves a small gap, which [`ProbabilityTable::sample_with`]
/// tolerates down to [`MIN_TABLE_TOTAL`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityTable {
    classes: Vec<u32>,
    probabilities: Vec<f64>,
    /// Running total after each entry, in insertion order
    cumulative: Vec<f64>,
}

impl ProbabilityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` classes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            classes: Vec::with_capacity(capacity),
            probabilities: Vec::with_capacity(capacity),
            cumulative: Vec::with_capacity(capacity),
        }
    }

    /// Append a class with its probability.
    pub fn push(&mut self, class: u32, probability: f64) {
        let total = self.total() + probability;
        self.classes.push(class);
        self.probabilities.push(probability);
        self.cumulative.push(total);
    }

    /// Accumulated probability of all entries.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The most recently inserted class.
    pub fn last_class(&self) -> Option<u32> {
        self.classes.last().copied()
    }

    /// Probability assigned to `class`, zero if the class is absent.
    pub fn probability(&self, class: u32) -> f64 {
        self.classes
            .iter()
            .zip(&self.probabilities)
            .filter(|&(&c, _)| c == class)
            .map(|(_, &p)| p)
            .sum()
    }

    /// Iterate over `(class, probability)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.classes
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Resolve a uniform value `u` in [0, 1) to a class.
    ///
    /// Returns the first class, in insertion order, whose cumulative
    /// probability exceeds `u`. When `u` lands in the rounding gap between
    /// the table total and one, the last inserted class is returned.
    ///
    /// # Errors
    /// `SamplingIntegrity` if the table total is NaN or below
    /// [`MIN_TABLE_TOTAL`].
    pub fn sample_with(&self, u: f64) -> Result<u32> {
        let total = self.total();
        if total.is_nan() || total < MIN_TABLE_TOTAL {
            return Err(SimulationError::SamplingIntegrity { total });
        }

        // Cumulative sums are non-decreasing, so the first entry exceeding u
        // is found by bisection.
        let idx = self.cumulative.partition_point(|&c| c <= u);
        match self.classes.get(idx) {
            Some(&class) => Ok(class),
            None => {
                trace!(u, total, "multinomial draw fell back to the last class");
                self.last_class()
                    .ok_or(SimulationError::SamplingIntegrity { total })
            }
        }
    }
}

impl FromIterator<(u32, f64)> for ProbabilityTable {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = Self::with_capacity(iter.size_hint().0);
        for (class, probability) in iter {
            table.push(class, probability);
        }
        table
    }
}

/// Owned pseudorandom stream plus the distributions drawn from it.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: Xoshiro256PlusPlus,
}

impl Sampler {
    /// Create a sampler from an explicit seed, or from system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self {
                rng: Xoshiro256PlusPlus::from_seed(rand::rng().random()),
            },
        }
    }

    /// Create a reproducible sampler.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Number of new mutations drawn from Poisson(`lambda`).
    pub fn poisson(&mut self, lambda: f64) -> Result<u32> {
        if lambda == 0.0 {
            return Ok(0);
        }
        let dist = Poisson::new(lambda).map_err(|e| {
            SimulationError::invalid(format!("Poisson rate {lambda} rejected: {e}"))
        })?;
        let draw = dist.sample(&mut self.rng);
        if draw > f64::from(u32::MAX) {
            return Err(SimulationError::DegenerateState(format!(
                "Poisson({lambda}) drew {draw} mutations, beyond the mutation class range"
            )));
        }
        Ok(draw as u32)
    }

    /// Number of successes out of `n` trials with probability `p`.
    pub fn binomial(&mut self, n: u32, p: f64) -> Result<u32> {
        let dist = Binomial::new(u64::from(n), p).map_err(|e| {
            SimulationError::invalid(format!("Binomial({n}, {p}) rejected: {e}"))
        })?;
        let draw = dist.sample(&mut self.rng);
        u32::try_from(draw).map_err(|_| {
            SimulationError::DegenerateState(format!(
                "Binomial({n}, {p}) drew {draw} successes, beyond the mutation class range"
            ))
        })
    }

    /// Weighted-multinomial draw of one class from `table`.
    pub fn multinomial(&mut self, table: &ProbabilityTable) -> Result<u32> {
        let u = self.uniform();
        table.sample_with(u)
    }

    /// Draw one seed per sub-stream for independent parallel work.
    pub fn fork_seeds(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.rng.random()).collect()
    }
}
