//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and validation.

use crate::errors::Result;
use crate::evolution::Algorithm;
use crate::simulation::{Configuration, Simulation, TimeScale};

/// Builder for constructing Simulation instances with a fluent API.
///
/// Every parameter starts at its default (N = 1000, m = 0.4, s = 0.1,
/// b = 0.0001, analytic reproduction, 1000 rescaled time units).
///
/// # Examples
///
/// ```
/// use ratchet_sim::evolution::Algorithm;
/// use ratchet_sim::simulation::SimulationBuilder;
///
/// let mut sim = SimulationBuilder::new()
///     .population_size(50)
///     .mutation(0.4)
///     .selection(0.1)
///     .algorithm(Algorithm::Direct)
///     .generations(2)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// sim.run().unwrap();
/// assert_eq!(sim.generation(), 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: Configuration,
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_configuration(config: Configuration) -> Self {
        Self { config }
    }

    /// Set the population size (N).
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.model.population_size = size;
        self
    }

    /// Set the expected number of new mutations per offspring (m).
    pub fn mutation(mut self, rate: f64) -> Self {
        self.config.model.mutation = rate;
        self
    }

    /// Set the fitness cost per mutation (s).
    pub fn selection(mut self, coefficient: f64) -> Self {
        self.config.model.selection = coefficient;
        self
    }

    /// Set the per-mutation reversion probability (b).
    pub fn backmutation(mut self, rate: f64) -> Self {
        self.config.model.backmutation = rate;
        self
    }

    /// Set the mutation load of the founding population (k0).
    pub fn initial_mutations(mut self, k0: u32) -> Self {
        self.config.model.initial_mutations = k0;
        self
    }

    /// Set the reproduction algorithm.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.execution.algorithm = algorithm;
        self
    }

    /// Set the run length, in units of the time scale.
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.execution.generations = generations;
        self
    }

    /// Set the time scale.
    pub fn time_scale(mut self, time_scale: TimeScale) -> Self {
        self.config.execution.time_scale = time_scale;
        self
    }

    /// Set random seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.execution.seed = Some(seed);
        self
    }

    /// Draw offspring in parallel.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.execution.parallel = parallel;
        self
    }

    /// Set the analytic algorithm's back-mutation look-back window.
    pub fn lookback_window(mut self, window: u32) -> Self {
        self.config.execution.lookback_window = window;
        self
    }

    /// The configuration built so far.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Build the simulation.
    ///
    /// # Errors
    /// `InvalidParameter` if any model parameter is out of range.
    pub fn build(self) -> Result<Simulation> {
        Simulation::new(self.config)
    }
}
