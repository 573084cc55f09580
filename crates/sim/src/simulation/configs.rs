//! Simulation parameters and configuration.
//!
//! This module provides parameter structures for configuring simulations:
//! the population-genetic model itself and how a run is executed and
//! reported.

use crate::errors::{Result, SimulationError};
use crate::evolution::{Algorithm, DEFAULT_LOOKBACK_WINDOW, MAX_ANALYTIC_MUTATION};
use serde::{Deserialize, Serialize};

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub model: ModelParameters,
    pub execution: ExecutionConfig,
}

impl Configuration {
    /// Create a configuration from its parts.
    pub fn new(model: ModelParameters, execution: ExecutionConfig) -> Self {
        Self { model, execution }
    }

    /// Check every parameter, including the limits of the chosen algorithm.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.execution.algorithm == Algorithm::Analytic
            && self.model.mutation > MAX_ANALYTIC_MUTATION
        {
            return Err(SimulationError::invalid(format!(
                "mutation rate {} exceeds the analytic limit of {MAX_ANALYTIC_MUTATION}; use the direct algorithm",
                self.model.mutation
            )));
        }
        Ok(())
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::invalid(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::invalid(format!("cannot serialize configuration: {e}")))
    }
}

/// Parameters of the population-genetic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Number of individuals (N)
    pub population_size: usize,
    /// Expected number of new deleterious mutations per offspring (m)
    pub mutation: f64,
    /// Fitness cost per mutation (s)
    pub selection: f64,
    /// Per-mutation probability of reversion per generation (b)
    pub backmutation: f64,
    /// Mutations carried by every individual at generation zero (k0)
    #[serde(default)]
    pub initial_mutations: u32,
}

impl ModelParameters {
    /// Create new model parameters.
    pub fn new(
        population_size: usize,
        mutation: f64,
        selection: f64,
        backmutation: f64,
        initial_mutations: u32,
    ) -> Self {
        Self {
            population_size,
            mutation,
            selection,
            backmutation,
            initial_mutations,
        }
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    /// `InvalidParameter` if the population is empty, the mutation rate is
    /// negative or not finite, or the selection or back-mutation rate lies
    /// outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SimulationError::invalid(
                "population size must be greater than 0",
            ));
        }
        if !(self.mutation >= 0.0 && self.mutation.is_finite()) {
            return Err(SimulationError::invalid(format!(
                "mutation rate must be a finite value >= 0, got {}",
                self.mutation
            )));
        }
        if !(0.0..=1.0).contains(&self.selection) {
            return Err(SimulationError::invalid(format!(
                "selection coefficient must be in [0, 1], got {}",
                self.selection
            )));
        }
        if !(0.0..=1.0).contains(&self.backmutation) {
            return Err(SimulationError::invalid(format!(
                "back-mutation rate must be in [0, 1], got {}",
                self.backmutation
            )));
        }
        Ok(())
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::new(1000, 0.4, 0.1, 0.0001, 0)
    }
}

/// How simulated time is counted and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    /// Time in units of N generations; one report every N generations
    #[default]
    Rescaled,
    /// Time in generations; one report every generation
    Generations,
}

/// How a run is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Reproduction algorithm
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Run length, in units of the time scale
    pub generations: usize,
    /// Time scale of `generations` and of reports
    #[serde(default)]
    pub time_scale: TimeScale,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
    /// Draw offspring on the rayon pool, one RNG sub-stream per offspring
    #[serde(default)]
    pub parallel: bool,
    /// Back-mutation look-back window of the analytic algorithm
    #[serde(default = "default_lookback_window")]
    pub lookback_window: u32,
}

fn default_lookback_window() -> u32 {
    DEFAULT_LOOKBACK_WINDOW
}

impl ExecutionConfig {
    /// Create new execution configuration with the remaining options at
    /// their defaults.
    pub fn new(algorithm: Algorithm, generations: usize, seed: Option<u64>) -> Self {
        Self {
            algorithm,
            generations,
            seed,
            ..Self::default()
        }
    }

    /// Number of generations between two reports.
    pub fn report_interval(&self, population_size: usize) -> usize {
        match self.time_scale {
            TimeScale::Rescaled => population_size.max(1),
            TimeScale::Generations => 1,
        }
    }

    /// Total number of generations to simulate.
    pub fn total_generations(&self, population_size: usize) -> usize {
        self.generations
            .saturating_mul(self.report_interval(population_size))
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            generations: 1000,
            time_scale: TimeScale::default(),
            seed: None,
            parallel: false,
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
        }
    }
}
