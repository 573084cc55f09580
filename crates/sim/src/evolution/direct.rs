//! Direct Wright–Fisher reproduction.
//!
//! Every offspring independently:
//! 1. picks a parent class with probability proportional to its selection
//!    weight,
//! 2. reverts `Binomial(k, b)` of the parent's `k` mutations,
//! 3. gains `Poisson(m)` new mutations.
//!
//! This is exact up to the limits of discrete sampling, but costs one
//! multinomial, one binomial and one Poisson draw per offspring.

use crate::errors::{Result, SimulationError};
use crate::evolution::{draw_offspring, Offspring, ProbabilityTable, Sampler};
use crate::simulation::{ModelParameters, Population};

/// Per-offspring reproduction.
#[derive(Debug, Clone)]
pub struct DirectReproduction {
    mutation: f64,
    backmutation: f64,
    parallel: bool,
}

impl DirectReproduction {
    /// Create the strategy for the given model.
    pub fn new(params: &ModelParameters, parallel: bool) -> Self {
        Self {
            mutation: params.mutation,
            backmutation: params.backmutation,
            parallel,
        }
    }

    /// Probability that an offspring descends from each occupied class.
    pub fn parent_table(&self, population: &Population) -> Result<ProbabilityTable> {
        let mean_fitness = population.mean_fitness()?;
        Ok(population
            .classes()
            .map(|(class, _)| (class, population.selection_weight(class) / mean_fitness))
            .collect())
    }

    /// Draw the next generation.
    pub fn next_generation(
        &self,
        population: &Population,
        sampler: &mut Sampler,
    ) -> Result<Offspring> {
        let parents = self.parent_table(population)?;
        draw_offspring(population.size(), self.parallel, sampler, |rng| {
            self.draw_child(&parents, rng)
        })
    }

    fn draw_child(&self, parents: &ProbabilityTable, sampler: &mut Sampler) -> Result<u32> {
        let mut class = sampler.multinomial(parents)?;
        if self.backmutation > 0.0 && class > 0 {
            class -= sampler.binomial(class, self.backmutation)?;
        }
        let gained = sampler.poisson(self.mutation)?;
        class.checked_add(gained).ok_or_else(|| {
            SimulationError::DegenerateState(format!(
                "class {class} plus {gained} new mutations exceeds the mutation class range"
            ))
        })
    }
}
